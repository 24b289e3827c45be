// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Default keybinding tables

use super::{ActionId, Key};
use crate::editing::MapMode;
use indexmap::IndexMap;

/// Action → key table for one mode, in declaration order
pub type ModeBindings = IndexMap<ActionId, Key>;

/// Action → key tables for every mode
#[derive(Debug, Clone, PartialEq)]
pub struct Keybinds {
    select: ModeBindings,
    edit: ModeBindings,
}

impl Keybinds {
    /// The built-in bindings
    pub fn defaults() -> Self {
        let select = [
            (ActionId::SwitchToEditMode, "e"),
            (ActionId::DeleteFeature, "Backspace"),
        ];
        let edit = [
            (ActionId::SwitchToSelectMode, "s"),
            (ActionId::CommitToPolygon, "p"),
            (ActionId::CommitToPolyline, "l"),
            (ActionId::CommitToMarker, "m"),
            (ActionId::CommitFeature, "Enter"),
            (ActionId::UndoPreviousEdit, "Backspace"),
            (ActionId::UndoAllEdits, "Delete"),
        ];

        Self {
            select: select.into_iter().map(|(a, k)| (a, Key::from(k))).collect(),
            edit: edit.into_iter().map(|(a, k)| (a, Key::from(k))).collect(),
        }
    }

    /// Action to key table for `mode`
    pub fn for_mode(&self, mode: MapMode) -> &ModeBindings {
        match mode {
            MapMode::Select => &self.select,
            MapMode::Edit => &self.edit,
        }
    }

    /// Mutable action to key table for `mode`
    pub fn for_mode_mut(&mut self, mode: MapMode) -> &mut ModeBindings {
        match mode {
            MapMode::Select => &mut self.select,
            MapMode::Edit => &mut self.edit,
        }
    }
}

impl Default for Keybinds {
    fn default() -> Self {
        Self::defaults()
    }
}
