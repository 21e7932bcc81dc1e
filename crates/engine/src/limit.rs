// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency throttling over an inner task

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use sluice_core::{ItemRef, ItemValue};

use crate::task::{Lifecycle, Task, TaskEvent};

/// Admission counter and overflow queue. The two are one critical section:
/// they are only ever read or written together, under one lock.
#[derive(Debug, Default)]
struct Gate {
    working: usize,
    queue: VecDeque<ItemRef>,
}

enum Outcome {
    Completed,
    Failed,
}

/// Decorator admitting at most N concurrently in-flight items to an inner
/// task, queueing the rest and releasing them FIFO as capacity frees up.
///
/// The limit may be fixed or resolved per item. The inner task's completion
/// and failure events may arrive from any thread; each frees the finished
/// item's slot, admits the oldest queued item if there is one, and then
/// re-fires the matching outer event, so chained consumers observe the same
/// two-state outcome as with a plain task.
pub struct LimitConcurrent {
    lifecycle: Lifecycle,
    limit: ItemValue<usize>,
    inner: Arc<dyn Task>,
    gate: Mutex<Gate>,
}

impl LimitConcurrent {
    /// Wrap `inner`, admitting at most `limit` items at a time.
    ///
    /// Subscribes to the inner task's `complete` and `fail` signals. The
    /// subscriptions hold weak references back to the returned handle, so
    /// the handle must stay alive for the wiring to hold.
    pub fn new(limit: impl Into<ItemValue<usize>>, inner: Arc<dyn Task>) -> Arc<Self> {
        let limit = limit.into();
        let lifecycle = Lifecycle::new(format!("LimitConcurrent({} x {})", limit, inner.id()));
        let this = Arc::new(Self {
            lifecycle,
            limit,
            inner: inner.clone(),
            gate: Mutex::new(Gate::default()),
        });

        let weak = Arc::downgrade(&this);
        inner.events().complete.subscribe(move |event: &TaskEvent| {
            if let Some(limiter) = weak.upgrade() {
                limiter.inner_done(event, Outcome::Completed);
            }
        });

        let weak = Arc::downgrade(&this);
        inner.events().fail.subscribe(move |event: &TaskEvent| {
            if let Some(limiter) = weak.upgrade() {
                limiter.inner_done(event, Outcome::Failed);
            }
        });

        this
    }

    /// Items currently admitted to the inner task.
    pub fn working(&self) -> usize {
        self.gate().working
    }

    /// Items held back waiting for capacity.
    pub fn queued(&self) -> usize {
        self.gate().queue.len()
    }

    fn gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Inner task finished an item: free its slot, admit the oldest queued
    /// item if any, then re-fire the matching outer event.
    ///
    /// Forwarding happens outside the lock: a synchronous inner task fires
    /// its completion event (and re-enters this handler) before `enqueue`
    /// returns.
    fn inner_done(&self, event: &TaskEvent, outcome: Outcome) {
        let next = {
            let mut gate = self.gate();
            debug_assert!(gate.working > 0, "completion without admission");
            gate.working -= 1;
            let next = gate.queue.pop_front();
            if next.is_some() {
                gate.working += 1;
            }
            next
        };

        if let Some(item) = next {
            tracing::debug!(task = %self.id(), item = %item.id(), "admitting queued item");
            self.inner.enqueue(item);
        }

        match outcome {
            Outcome::Completed => self.lifecycle.complete_item(&event.item),
            Outcome::Failed => self.lifecycle.fail_item(&event.item),
        }
    }
}

impl Task for LimitConcurrent {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn enqueue(&self, item: ItemRef) {
        let limit = self.limit.resolve(&item);
        let admitted = {
            let mut gate = self.gate();
            if gate.working < limit {
                gate.working += 1;
                true
            } else {
                tracing::debug!(
                    task = %self.id(),
                    item = %item.id(),
                    queued = gate.queue.len() + 1,
                    "at capacity, queueing"
                );
                gate.queue.push_back(item.clone());
                false
            }
        };

        if admitted {
            self.inner.enqueue(item);
        }
    }
}

#[cfg(test)]
#[path = "limit_tests.rs"]
mod tests;
