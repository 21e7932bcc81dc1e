// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item state
//!
//! An item is one unit of work flowing through a chain of tasks. It carries
//! a keyed property store, a per-task status map, an append-only log, and a
//! slot for errors caught on its behalf. Items are created by the pipeline
//! driver, shared as [`ItemRef`], mutated in place by tasks, and never
//! destroyed by the core.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::{TaskId, TaskStatus};

/// Unique identifier for an item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

/// Shared handle to an item.
///
/// Tasks receive items through this handle; interior state is behind a mutex
/// so completion events arriving from other threads can mutate safely.
pub type ItemRef = Arc<Item>;

/// An error a task recorded against an item.
#[derive(Clone)]
pub struct Failure {
    pub task: TaskId,
    pub error: Arc<dyn Error + Send + Sync>,
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("task", &self.task)
            .field("error", &self.error.to_string())
            .finish()
    }
}

/// Serializable form of a recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSnapshot {
    pub task: String,
    pub error: String,
}

/// Serializable view of an item's full state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub properties: HashMap<String, Value>,
    /// Statuses keyed by task name.
    pub statuses: HashMap<String, TaskStatus>,
    pub log: String,
    pub errors: Vec<FailureSnapshot>,
}

#[derive(Debug, Default)]
struct ItemState {
    properties: HashMap<String, Value>,
    statuses: HashMap<TaskId, TaskStatus>,
    log: String,
    failures: Vec<Failure>,
}

/// A mutable per-job data record.
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    state: Mutex<ItemState>,
}

impl Item {
    /// Create an item with a fresh v4 uuid id.
    pub fn new() -> ItemRef {
        Self::with_id(ItemId(uuid::Uuid::new_v4().to_string()))
    }

    /// Create an item with an explicit id.
    pub fn with_id(id: impl Into<ItemId>) -> ItemRef {
        Arc::new(Item {
            id: id.into(),
            state: Mutex::new(ItemState::default()),
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    fn state(&self) -> MutexGuard<'_, ItemState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read one property.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state().properties.get(key).cloned()
    }

    /// Write one property.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.state().properties.insert(key.into(), value.into());
    }

    /// This item's status for `task`; `Pending` if the task never touched it.
    pub fn status(&self, task: &TaskId) -> TaskStatus {
        self.state()
            .statuses
            .get(task)
            .copied()
            .unwrap_or(TaskStatus::Pending)
    }

    /// Record this item's status for `task`.
    ///
    /// Task lifecycle transitions are the only callers; other code must not
    /// alter per-task status directly.
    pub fn set_status(&self, task: &TaskId, status: TaskStatus) {
        self.state().statuses.insert(task.clone(), status);
    }

    /// Append one line to the item's log, stamped with the current UTC time.
    pub fn append_log(&self, line: impl AsRef<str>) {
        let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let mut state = self.state();
        state.log.push_str(&format!("[{stamp}] {}\n", line.as_ref()));
    }

    /// The accumulated log text.
    pub fn log(&self) -> String {
        self.state().log.clone()
    }

    /// Associate a caught failure with `task`.
    pub fn record_error(&self, task: &TaskId, error: Arc<dyn Error + Send + Sync>) {
        tracing::debug!(task = %task, item = %self.id, error = %error, "recording failure");
        self.state().failures.push(Failure {
            task: task.clone(),
            error,
        });
    }

    /// Failures recorded so far, in recording order.
    pub fn failures(&self) -> Vec<Failure> {
        self.state().failures.clone()
    }

    /// Human-readable description: the `"description"` property if set,
    /// else `item <id>`.
    pub fn description(&self) -> String {
        match self.get("description") {
            Some(Value::String(s)) => s,
            _ => format!("item {}", self.id),
        }
    }

    /// Serializable snapshot of the full record.
    pub fn snapshot(&self) -> ItemSnapshot {
        let state = self.state();
        ItemSnapshot {
            id: self.id.clone(),
            properties: state.properties.clone(),
            statuses: state
                .statuses
                .iter()
                .map(|(task, status)| (task.to_string(), *status))
                .collect(),
            log: state.log.clone(),
            errors: state
                .failures
                .iter()
                .map(|failure| FailureSnapshot {
                    task: failure.task.to_string(),
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
