// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task execution specs
//!
//! Verify the running → {completed, failed} state machine and the
//! throttled end-to-end scenario.

use std::sync::Arc;

use sluice_core::{IdGen, Item, SequentialIdGen, TaskStatus};
use sluice_engine::{
    LimitConcurrent, PrintItem, SetItemKey, SimpleTask, Step, StepError, Task,
};

use crate::prelude::*;

struct Boom;

impl Step for Boom {
    fn name(&self) -> String {
        "Boom".to_string()
    }

    fn run(&self, _item: &sluice_core::ItemRef) -> Result<(), StepError> {
        Err(StepError::message("boom"))
    }
}

#[test]
fn three_items_through_a_throttled_set_item_key() {
    let _cwd = cwd_lock();
    let inner = SimpleTask::shared(SetItemKey::new("k", "v"));
    let trace = Trace::new();
    trace.watch("inner", inner.as_ref());

    let limiter = LimitConcurrent::new(1usize, inner);

    let id_gen = SequentialIdGen::default();
    let items: Vec<_> = (0..3).map(|_| Item::with_id(id_gen.next())).collect();
    for item in &items {
        limiter.enqueue(item.clone());
    }

    for item in &items {
        assert_eq!(item.get("k"), Some(serde_json::Value::from("v")));
        assert_eq!(item.status(limiter.id()), TaskStatus::Completed);
    }

    // At most one start without an intervening finish, at any point.
    let mut running = 0i32;
    for entry in trace.take() {
        if entry.contains(":start:") {
            running += 1;
        } else if entry.contains(":finish:") {
            running -= 1;
        }
        assert!(running <= 1, "two items in flight: {entry}");
    }
    assert_eq!(running, 0);
}

#[test]
fn failed_items_flow_onward_exactly_like_completed_ones() {
    let _cwd = cwd_lock();
    let inner = SimpleTask::shared(Boom);
    let limiter = LimitConcurrent::new(1usize, inner);
    let trace = Trace::new();
    trace.watch("limiter", limiter.as_ref());

    let first = Item::with_id("item-1");
    let second = Item::with_id("item-2");
    limiter.enqueue(first.clone());
    limiter.enqueue(second.clone());

    assert_eq!(first.status(limiter.id()), TaskStatus::Failed);
    assert_eq!(second.status(limiter.id()), TaskStatus::Failed);
    similar_asserts::assert_eq!(
        trace.take(),
        vec![
            "limiter:fail:item-1",
            "limiter:finish:item-1",
            "limiter:fail:item-2",
            "limiter:finish:item-2",
        ]
    );
}

#[test]
fn the_recorded_error_is_the_step_error() {
    let _cwd = cwd_lock();
    let task = SimpleTask::new(Boom);

    let item = Item::with_id("item-1");
    task.enqueue(item.clone());

    let failures = item.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].task, *task.id());

    let step_error = failures[0]
        .error
        .downcast_ref::<StepError>()
        .expect("recorded error is the StepError the step returned");
    assert!(matches!(step_error, StepError::Message(m) if m == "boom"));
}

#[test]
fn tasks_chain_through_completion_subscriptions() {
    let _cwd = cwd_lock();
    let fetch = SimpleTask::shared(SetItemKey::new("fetched", true));
    let report: Arc<dyn Task> = SimpleTask::shared(PrintItem);

    // Explicit chaining by the caller: completion hands the item onward.
    let downstream = report.clone();
    fetch.events().complete.subscribe(move |event| {
        downstream.enqueue(event.item.clone());
    });

    let item = Item::with_id("item-1");
    item.set("description", "archive of example.org");
    fetch.enqueue(item.clone());

    assert_eq!(item.status(fetch.id()), TaskStatus::Completed);
    assert_eq!(item.status(report.id()), TaskStatus::Completed);
    assert!(item.log().contains("archive of example.org"));
}

#[test]
fn item_logs_tell_the_story_of_the_run() {
    let _cwd = cwd_lock();
    let task = SimpleTask::new(SetItemKey::new("k", "v"));
    let item = Item::with_id("item-1");

    task.enqueue(item.clone());

    let log = item.log();
    let starting = log
        .lines()
        .position(|line| line.contains("Starting SetItemKey"))
        .unwrap();
    let finished = log
        .lines()
        .position(|line| line.contains("Finished SetItemKey"))
        .unwrap();
    assert!(starting < finished);
}
