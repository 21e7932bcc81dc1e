// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Working-directory scoping for task execution

use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Guard that switches the process working directory and restores the
/// previous one on drop, on every exit path.
///
/// The working directory is process-global state: this guard is not
/// reentrant across threads, and callers that run tasks on parallel threads
/// must serialize around it.
#[derive(Debug)]
pub struct ScopedDir {
    saved: PathBuf,
}

impl ScopedDir {
    /// Switch to `dir`, remembering the directory current right now.
    pub fn enter(dir: &Path) -> io::Result<Self> {
        let saved = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(Self { saved })
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        // Nothing sane to report if the original directory is gone.
        let _ = env::set_current_dir(&self.saved);
    }
}
