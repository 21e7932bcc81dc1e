// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous single-step tasks

use std::sync::Arc;

use sluice_core::ItemRef;

use crate::error::StepError;
use crate::task::{Lifecycle, Task};
use crate::workdir::ScopedDir;

/// One synchronous, in-process unit of work.
///
/// The explicit `Result` is the failure channel: return `Err` to fail the
/// item. Panics are not caught.
pub trait Step: Send + Sync {
    /// Display name; becomes the task's identity.
    fn name(&self) -> String;

    /// Perform the work for one item.
    fn run(&self, item: &ItemRef) -> Result<(), StepError>;
}

/// Task that runs a [`Step`] on each enqueued item, converting any step
/// failure into a failed-item transition.
///
/// This is the sole task-level failure boundary: an error raised anywhere
/// inside the step is caught exactly once, here, and recorded against the
/// item. `enqueue` itself never fails, so a bad item cannot take down the
/// pipeline driver.
pub struct SimpleTask<S> {
    lifecycle: Lifecycle,
    step: S,
}

impl<S: Step + 'static> SimpleTask<S> {
    pub fn new(step: S) -> Self {
        let lifecycle = Lifecycle::new(step.name());
        Self { lifecycle, step }
    }

    /// An `Arc<dyn Task>` handle, ready for wiring into a pipeline.
    pub fn shared(step: S) -> Arc<dyn Task> {
        Arc::new(Self::new(step))
    }

    fn run_scoped(&self, item: &ItemRef) -> Result<(), StepError> {
        let _scope = ScopedDir::enter(self.lifecycle.dir())?;
        self.step.run(item)
    }
}

impl<S: Step + 'static> Task for SimpleTask<S> {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn enqueue(&self, item: ItemRef) {
        let span = tracing::debug_span!("task", task = %self.id(), item = %item.id());
        let _guard = span.enter();

        self.lifecycle.start_item(&item);
        item.append_log(format!("Starting {} for {}", self.id(), item.description()));

        match self.run_scoped(&item) {
            Ok(()) => {
                item.append_log(format!("Finished {} for {}", self.id(), item.description()));
                self.lifecycle.complete_item(&item);
            }
            Err(err) => {
                tracing::warn!(error = %err, "step failed");
                item.append_log(format!("Failed {} for {}", self.id(), item.description()));
                item.append_log(err.detail());
                item.record_error(self.id(), Arc::new(err));
                self.lifecycle.fail_item(&item);
            }
        }
    }
}

#[cfg(test)]
#[path = "simple_tests.rs"]
mod tests;
