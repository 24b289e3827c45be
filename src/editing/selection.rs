// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Single-feature selection.
//!
//! At most one feature is selected at a time. Every change reports the
//! previous and next selection so the session can flush metadata for the
//! feature being left and fill the editor for the one being entered.

use crate::model::FeatureKey;

/// A change from one selection to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<FeatureKey>,
    pub next: Option<FeatureKey>,
}

/// The currently selected feature, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<FeatureKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected feature, if any
    pub fn current(&self) -> Option<FeatureKey> {
        self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Whether `key` is the selected feature
    pub fn contains(&self, key: FeatureKey) -> bool {
        self.current == Some(key)
    }

    /// Select `next`, returning the change or `None` when nothing changed
    pub fn set(&mut self, next: Option<FeatureKey>) -> Option<SelectionChange> {
        if self.current == next {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, next);
        Some(SelectionChange { previous, next })
    }

    /// Drop the selection without reporting a change
    pub fn take(&mut self) -> Option<FeatureKey> {
        self.current.take()
    }
}
