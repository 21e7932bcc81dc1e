// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle: identity, working directory, and transition signals
//!
//! Every task shares the same skeleton: a display name, a working directory
//! captured when the task was assembled, and four signals announcing item
//! transitions. Tasks are built once at pipeline-assembly time and live for
//! the process lifetime; they hold no per-item state of their own.

use std::env;
use std::path::{Path, PathBuf};

use sluice_core::{ItemRef, Signal, TaskId, TaskStatus};

/// Payload delivered to lifecycle subscribers.
#[derive(Clone)]
pub struct TaskEvent {
    pub task: TaskId,
    pub item: ItemRef,
}

/// The four lifecycle signals every task exposes.
///
/// `finish` fires exactly once per item, immediately after either `complete`
/// or `fail`, and never both for the same item.
#[derive(Debug, Default)]
pub struct TaskEvents {
    pub start: Signal<TaskEvent>,
    pub complete: Signal<TaskEvent>,
    pub fail: Signal<TaskEvent>,
    pub finish: Signal<TaskEvent>,
}

/// State shared by every task, with the only status-mutating entry points.
pub struct Lifecycle {
    id: TaskId,
    dir: PathBuf,
    events: TaskEvents,
}

impl Lifecycle {
    /// Build a lifecycle named `name`, capturing the current working
    /// directory as the task's execution directory.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TaskId(name.into()),
            // "." if the process cwd is unreadable at assembly time.
            dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            events: TaskEvents::default(),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// The directory captured at construction; the task body runs under it.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn events(&self) -> &TaskEvents {
        &self.events
    }

    /// Mark `item` running for this task and announce it.
    pub fn start_item(&self, item: &ItemRef) {
        item.set_status(&self.id, TaskStatus::Running);
        self.events.start.emit(&self.event(item));
    }

    /// Mark `item` completed; `complete` fires, then `finish`.
    pub fn complete_item(&self, item: &ItemRef) {
        item.set_status(&self.id, TaskStatus::Completed);
        let event = self.event(item);
        self.events.complete.emit(&event);
        self.events.finish.emit(&event);
    }

    /// Mark `item` failed; `fail` fires, then `finish`.
    pub fn fail_item(&self, item: &ItemRef) {
        item.set_status(&self.id, TaskStatus::Failed);
        let event = self.event(item);
        self.events.fail.emit(&event);
        self.events.finish.emit(&event);
    }

    fn event(&self, item: &ItemRef) -> TaskEvent {
        TaskEvent {
            task: self.id.clone(),
            item: item.clone(),
        }
    }
}

/// A named processing step items are enqueued onto.
pub trait Task: Send + Sync {
    /// The shared lifecycle: identity, working directory, signals.
    fn lifecycle(&self) -> &Lifecycle;

    /// Accept `item` for processing.
    fn enqueue(&self, item: ItemRef);

    /// This task's identity.
    fn id(&self) -> &TaskId {
        self.lifecycle().id()
    }

    /// This task's lifecycle signals.
    fn events(&self) -> &TaskEvents {
        self.lifecycle().events()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
