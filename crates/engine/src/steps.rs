// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in leaf steps

use serde_json::Value;
use sluice_core::{Item, ItemRef, ItemValue};

use crate::error::StepError;
use crate::simple::Step;

/// Writes one key/value pair into the item's property store.
///
/// The value may be fixed or derived from the item; it is resolved once per
/// run.
pub struct SetItemKey {
    key: String,
    value: ItemValue<Value>,
}

impl SetItemKey {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: ItemValue::Fixed(value.into()),
        }
    }

    /// Value computed from the item at run time.
    pub fn derived(
        key: impl Into<String>,
        f: impl Fn(&Item) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            value: ItemValue::derived(f),
        }
    }
}

impl Step for SetItemKey {
    fn name(&self) -> String {
        format!("SetItemKey({}: {})", self.key, self.value)
    }

    fn run(&self, item: &ItemRef) -> Result<(), StepError> {
        item.set(self.key.clone(), self.value.resolve(item));
        Ok(())
    }
}

/// Logs the item's display form to the item's own log.
#[derive(Default)]
pub struct PrintItem;

impl Step for PrintItem {
    fn name(&self) -> String {
        "PrintItem".to_string()
    }

    fn run(&self, item: &ItemRef) -> Result<(), StepError> {
        tracing::info!(item = %item.id(), "{item}");
        item.append_log(item.to_string());
        Ok(())
    }
}
