// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous multi-subscriber event channel
//!
//! Each task owns one `Signal` per lifecycle event; there is no global
//! registry. Dispatch is synchronous, in registration order, in the emitting
//! thread, and collects no return values. A handler that panics is the
//! emitter's caller's problem.

use std::fmt;
use std::sync::{Arc, Mutex};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An observer list for one event.
///
/// Handlers are invoked in the order they subscribed. The list is snapshotted
/// before dispatch, so a handler may subscribe to or emit on the same signal
/// without deadlocking; handlers registered during dispatch only see later
/// emissions.
pub struct Signal<T> {
    handlers: Mutex<Vec<Handler<T>>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Register a handler, appended after all existing handlers.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.push(Arc::new(handler));
    }

    /// Invoke every registered handler with `payload`, in the calling thread.
    pub fn emit(&self, payload: &T) {
        let snapshot: Vec<Handler<T>> = {
            let handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
            handlers.clone()
        };
        for handler in &snapshot {
            handler(payload);
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
