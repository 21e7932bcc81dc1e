// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for engine tests

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use sluice_core::ItemRef;

use crate::task::{Lifecycle, Task};

/// Serializes tests that read or change the process working directory.
pub(crate) fn cwd_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Inner task whose items complete only when the test says so, standing in
/// for work that finishes later from another execution context.
pub(crate) struct ManualTask {
    lifecycle: Lifecycle,
    admitted: Mutex<Vec<ItemRef>>,
}

impl ManualTask {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            lifecycle: Lifecycle::new(name),
            admitted: Mutex::new(Vec::new()),
        })
    }

    /// Items handed to this task so far, in admission order.
    pub fn admitted(&self) -> Vec<ItemRef> {
        self.admitted.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn complete(&self, item: &ItemRef) {
        self.lifecycle.complete_item(item);
    }

    pub fn fail(&self, item: &ItemRef) {
        self.lifecycle.fail_item(item);
    }
}

impl Task for ManualTask {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn enqueue(&self, item: ItemRef) {
        self.lifecycle.start_item(&item);
        self.admitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(item);
    }
}
