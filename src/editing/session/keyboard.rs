// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard dispatch for EditSession

use super::EditSession;
use crate::editing::edit_types::{CommitMode, MapMode};
use crate::keymap::ActionId;

impl EditSession {
    /// Resolve `key` in the active mode's table and run its action.
    ///
    /// Returns the action that ran, or `None` when the key is unbound.
    pub fn handle_key(&mut self, key: &str) -> Option<ActionId> {
        let Some(action) = self.mappings.resolve(self.mode, key) else {
            tracing::debug!("No action for {key:?} in {} mode", self.mode);
            return None;
        };
        tracing::debug!("{key:?} -> {action}");
        self.run_action(action);
        Some(action)
    }

    /// Run `action` regardless of which key triggered it
    pub fn run_action(&mut self, action: ActionId) {
        match action {
            ActionId::SwitchToEditMode => self.set_mode(MapMode::Edit),
            ActionId::DeleteFeature => self.delete_selected(),
            ActionId::SwitchToSelectMode => self.set_mode(MapMode::Select),
            ActionId::CommitToPolygon => self.set_commit_mode(CommitMode::Polygon),
            ActionId::CommitToPolyline => self.set_commit_mode(CommitMode::Polyline),
            ActionId::CommitToMarker => self.set_commit_mode(CommitMode::Marker),
            ActionId::CommitFeature => self.commit_feature(),
            ActionId::UndoPreviousEdit => {
                self.path.pop();
            }
            ActionId::UndoAllEdits => self.path.clear(),
        }
    }
}
