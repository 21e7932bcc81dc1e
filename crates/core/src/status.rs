// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identity and per-task item status

use serde::{Deserialize, Serialize};

/// Unique identifier for a task: its display name.
///
/// Items key their status map by `TaskId`, so drivers should give distinct
/// names to distinct task instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Progress of one item through one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task has not touched the item yet
    Pending,
    /// The task is actively working on the item
    Running,
    /// The task finished the item successfully
    Completed,
    /// The task gave up on the item
    Failed,
}

impl TaskStatus {
    /// Check if the status is terminal (completed or failed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}
