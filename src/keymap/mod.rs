// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-mode keybindings and their key → action lookup.
//!
//! Bindings are declared action-first (`commitFeature = "Enter"`), since that
//! is how users override them, but dispatch needs the opposite direction.
//! `ActionMappings::build` overlays user overrides onto the defaults and then
//! inverts each mode's table. Declaration order is preserved throughout so
//! that when two actions end up on the same key the first-declared one wins,
//! every time.

mod defaults;
mod overrides;
mod resolver;

pub use defaults::{Keybinds, ModeBindings};
pub use overrides::{ConfigError, KeybindOverrides};
pub use resolver::{ActionMappings, KeybindConflict};

use crate::editing::MapMode;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A physical key, named the way browsers name `KeyboardEvent.key`
/// (`"e"`, `"Enter"`, `"Backspace"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The key name, e.g. `Enter`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Every keyboard action the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionId {
    // Select mode
    SwitchToEditMode,
    DeleteFeature,
    // Edit mode
    SwitchToSelectMode,
    CommitToPolygon,
    CommitToPolyline,
    CommitToMarker,
    CommitFeature,
    UndoPreviousEdit,
    UndoAllEdits,
}

impl ActionId {
    /// The mode whose table this action belongs to
    pub fn mode(self) -> MapMode {
        match self {
            ActionId::SwitchToEditMode | ActionId::DeleteFeature => MapMode::Select,
            ActionId::SwitchToSelectMode
            | ActionId::CommitToPolygon
            | ActionId::CommitToPolyline
            | ActionId::CommitToMarker
            | ActionId::CommitFeature
            | ActionId::UndoPreviousEdit
            | ActionId::UndoAllEdits => MapMode::Edit,
        }
    }

    /// Short label for help listings
    pub fn label(self) -> &'static str {
        match self {
            ActionId::SwitchToEditMode => "Edit",
            ActionId::DeleteFeature => "Delete selected feature",
            ActionId::SwitchToSelectMode => "Select",
            ActionId::CommitToPolygon => "Polygon",
            ActionId::CommitToPolyline => "Polyline",
            ActionId::CommitToMarker => "Marker",
            ActionId::CommitFeature => "Save feature",
            ActionId::UndoPreviousEdit => "Undo last point",
            ActionId::UndoAllEdits => "Discard path",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same spelling as the override files
        let name = match self {
            ActionId::SwitchToEditMode => "switchToEditMode",
            ActionId::DeleteFeature => "deleteFeature",
            ActionId::SwitchToSelectMode => "switchToSelectMode",
            ActionId::CommitToPolygon => "commitToPolygon",
            ActionId::CommitToPolyline => "commitToPolyline",
            ActionId::CommitToMarker => "commitToMarker",
            ActionId::CommitFeature => "commitFeature",
            ActionId::UndoPreviousEdit => "undoPreviousEdit",
            ActionId::UndoAllEdits => "undoAllEdits",
        };
        f.write_str(name)
    }
}
