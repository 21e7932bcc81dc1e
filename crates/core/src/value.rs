// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Constant-or-derived per-item values
//!
//! Some task parameters are fixed at assembly time; others depend on the
//! item being processed (a concurrency limit read off the item, a property
//! value built from other properties). `ItemValue` makes the two cases an
//! explicit tagged choice, resolved at the call site rather than through
//! implicit callable dispatch.

use std::fmt;
use std::sync::Arc;

use crate::item::Item;

/// A value that is either fixed or computed per item.
pub enum ItemValue<T> {
    /// The same value for every item.
    Fixed(T),
    /// Computed from the item at resolution time.
    Derived(Arc<dyn Fn(&Item) -> T + Send + Sync>),
}

impl<T: Clone> ItemValue<T> {
    /// Build a derived value from a closure.
    pub fn derived(f: impl Fn(&Item) -> T + Send + Sync + 'static) -> Self {
        ItemValue::Derived(Arc::new(f))
    }

    /// The fixed value, or the closure's result for this item.
    pub fn resolve(&self, item: &Item) -> T {
        match self {
            ItemValue::Fixed(value) => value.clone(),
            ItemValue::Derived(f) => f(item),
        }
    }
}

impl<T> From<T> for ItemValue<T> {
    fn from(value: T) -> Self {
        ItemValue::Fixed(value)
    }
}

impl<T: Clone> Clone for ItemValue<T> {
    fn clone(&self) -> Self {
        match self {
            ItemValue::Fixed(value) => ItemValue::Fixed(value.clone()),
            ItemValue::Derived(f) => ItemValue::Derived(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ItemValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Fixed(value) => write!(f, "{value}"),
            ItemValue::Derived(_) => write!(f, "dynamic"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ItemValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            ItemValue::Derived(_) => f.debug_tuple("Derived").field(&"..").finish(),
        }
    }
}
