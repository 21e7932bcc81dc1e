// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chains tasks into a pipeline
//!
//! The pipeline is plain wiring over task signals: each task's `complete`
//! enqueues the item on the next task, and an item that runs off the end of
//! the chain (or fails, when failures short-circuit) leaves the pipeline
//! through `on_finish`.

use std::sync::Arc;

use sluice_core::{ItemRef, Signal};

use crate::task::{Task, TaskEvent};

/// Behavior of the chain around failed items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// When true, a failed item still flows to the next task (failure and
    /// completion both finish the task, and downstream decides what to make
    /// of it). When false, a failure short-circuits the chain.
    pub continue_on_failure: bool,
}

/// Tasks wired in sequence.
pub struct Pipeline {
    tasks: Vec<Arc<dyn Task>>,
    config: PipelineConfig,
    /// Fires when an item leaves the pipeline: after the last task, or at a
    /// failing task when failures short-circuit.
    pub on_finish: Signal<ItemRef>,
}

impl Pipeline {
    /// Wire `tasks` into a chain.
    ///
    /// Subscriptions hold weak references back to the returned handle; keep
    /// it alive for as long as items are in flight.
    pub fn new(tasks: Vec<Arc<dyn Task>>, config: PipelineConfig) -> Arc<Self> {
        let this = Arc::new(Self {
            tasks,
            config,
            on_finish: Signal::new(),
        });

        for (index, task) in this.tasks.iter().enumerate() {
            let next = this.tasks.get(index + 1).cloned();

            let pipeline = Arc::downgrade(&this);
            let next_on_complete = next.clone();
            task.events().complete.subscribe(move |event: &TaskEvent| {
                match &next_on_complete {
                    Some(next) => next.enqueue(event.item.clone()),
                    None => {
                        if let Some(pipeline) = pipeline.upgrade() {
                            pipeline.release(&event.item);
                        }
                    }
                }
            });

            let pipeline = Arc::downgrade(&this);
            let continue_on_failure = config.continue_on_failure;
            task.events().fail.subscribe(move |event: &TaskEvent| {
                match (&next, continue_on_failure) {
                    (Some(next), true) => next.enqueue(event.item.clone()),
                    _ => {
                        if let Some(pipeline) = pipeline.upgrade() {
                            pipeline.release(&event.item);
                        }
                    }
                }
            });
        }

        this
    }

    /// Hand an item to the first task. An empty pipeline releases the item
    /// immediately.
    pub fn enqueue(&self, item: ItemRef) {
        tracing::debug!(item = %item.id(), "entering pipeline");
        match self.tasks.first() {
            Some(first) => first.enqueue(item),
            None => self.release(&item),
        }
    }

    /// Number of tasks in the chain.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn release(&self, item: &ItemRef) {
        tracing::debug!(item = %item.id(), "leaving pipeline");
        self.on_finish.emit(item);
    }
}
