// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Working-directory scoping specs
//!
//! A task runs its step under the directory captured when the task was
//! assembled, and the caller's directory survives both outcomes.

use std::env;
use std::path::PathBuf;

use sluice_core::{Item, ItemRef, TaskStatus};
use sluice_engine::{SimpleTask, Step, StepError, Task};

use crate::prelude::*;

/// Records the observed working directory, then optionally fails.
struct Observe {
    fail_after: bool,
}

impl Step for Observe {
    fn name(&self) -> String {
        "Observe".to_string()
    }

    fn run(&self, item: &ItemRef) -> Result<(), StepError> {
        let cwd = env::current_dir()?;
        item.set("observed_cwd", cwd.to_string_lossy());
        if self.fail_after {
            return Err(StepError::message("observed, then failed"));
        }
        Ok(())
    }
}

fn assemble_in(dir: &std::path::Path, step: Observe) -> SimpleTask<Observe> {
    let original = env::current_dir().unwrap();
    env::set_current_dir(dir).unwrap();
    let task = SimpleTask::new(step);
    env::set_current_dir(original).unwrap();
    task
}

#[test]
fn the_step_observes_the_assembly_directory() {
    let _cwd = cwd_lock();
    let task_home = tempfile::tempdir().unwrap();
    let task = assemble_in(task_home.path(), Observe { fail_after: false });

    let before = env::current_dir().unwrap();
    let item = Item::with_id("item-1");
    task.enqueue(item.clone());

    let observed = PathBuf::from(item.get("observed_cwd").unwrap().as_str().unwrap());
    assert_eq!(
        observed.canonicalize().unwrap(),
        task_home.path().canonicalize().unwrap()
    );
    assert_eq!(env::current_dir().unwrap(), before);
    assert_eq!(item.status(task.id()), TaskStatus::Completed);
}

#[test]
fn the_callers_directory_survives_a_failing_step() {
    let _cwd = cwd_lock();
    let task_home = tempfile::tempdir().unwrap();
    let task = assemble_in(task_home.path(), Observe { fail_after: true });

    let before = env::current_dir().unwrap();
    let item = Item::with_id("item-1");
    task.enqueue(item.clone());

    // The step ran under the task's directory and failed there; the caller
    // is back where it started.
    let observed = PathBuf::from(item.get("observed_cwd").unwrap().as_str().unwrap());
    assert_eq!(
        observed.canonicalize().unwrap(),
        task_home.path().canonicalize().unwrap()
    );
    assert_eq!(env::current_dir().unwrap(), before);
    assert_eq!(item.status(task.id()), TaskStatus::Failed);
}
