// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer handling and selection changes for EditSession

use super::EditSession;
use crate::editing::edit_types::MapMode;
use crate::model::{FeatureKey, Point};
use crate::settings;
use crate::sync::FeaturePatch;

impl EditSession {
    /// A click that landed on the map itself
    pub fn click_background(&mut self, point: Point) {
        match self.mode {
            MapMode::Select => self.select(None),
            MapMode::Edit => self.path.push(point),
        }
    }

    /// A click that landed on a rendered feature
    pub fn click_feature(&mut self, key: FeatureKey) {
        match self.mode {
            MapMode::Select => {
                if !self.layer.bring_to_front(key) {
                    tracing::debug!("Click on unknown feature {key}");
                    return;
                }
                self.select(Some(key));
            }
            MapMode::Edit => tracing::debug!("Feature click ignored in edit mode"),
        }
    }

    /// A raw click at `point`, resolved against the layer.
    ///
    /// In Edit mode every click places a point, so paths can be drawn over
    /// existing features.
    pub fn click_at(&mut self, point: Point) {
        match self.mode {
            MapMode::Select => {
                match self.layer.hit_test(point, settings::editing::HIT_TOLERANCE) {
                    Some(key) => self.click_feature(key),
                    None => self.click_background(point),
                }
            }
            MapMode::Edit => self.click_background(point),
        }
    }

    /// Move the selection to `next`.
    ///
    /// On a real change the outgoing feature's metadata is flushed before
    /// the editor is refilled for the incoming one.
    pub(super) fn select(&mut self, next: Option<FeatureKey>) {
        if let Some(change) = self.selection.set(next) {
            if let Some(previous) = change.previous {
                self.flush_properties(previous);
            }

            match next.and_then(|key| self.layer.get(key)) {
                Some(feature) => self.editor.show(&feature.properties),
                None => self.editor.clear(),
            }

            tracing::debug!(previous = ?change.previous, next = ?change.next, "selection changed");
            self.selection_hooks.changed(change.previous, change.next);
        }
        self.selection_hooks.selected(next);
    }

    /// Write the editor's contents into `key` and queue a property update
    fn flush_properties(&mut self, key: FeatureKey) {
        let properties = self.editor.contents();
        let Some(feature) = self.layer.get_mut(key) else {
            tracing::debug!("Feature {key} left the layer before its flush");
            return;
        };
        feature.properties = properties.clone();

        if self
            .sync
            .update(key, FeaturePatch::properties(properties))
            .is_ok()
        {
            self.status.begin_save();
        }
    }
}
