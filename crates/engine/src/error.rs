// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for task steps

use thiserror::Error;

/// Failure of one task step for one item.
///
/// [`SimpleTask`](crate::SimpleTask) converts any `StepError` into a
/// failed-item transition; the error never propagates past that boundary.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step's working directory could not be entered.
    #[error("workdir error: {0}")]
    Workdir(#[from] std::io::Error),
    /// The step itself failed.
    #[error(transparent)]
    Step(#[from] Box<dyn std::error::Error + Send + Sync>),
    /// A failure described by a plain message.
    #[error("{0}")]
    Message(String),
}

impl StepError {
    /// A failure from a plain message.
    pub fn message(msg: impl Into<String>) -> Self {
        StepError::Message(msg.into())
    }

    /// The full failure detail: the error and its source chain.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            detail.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        detail
    }
}
