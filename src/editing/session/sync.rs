// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Feature lifecycle for EditSession: load, commit, delete, and applying
//! the results the store sends back

use super::EditSession;
use crate::components::FeatureSink;
use crate::editing::commit::commit;
use crate::model::{Feature, FeatureKey};
use crate::settings;
use crate::sync::{StoreError, SyncEvent};

impl EditSession {
    /// Fetch the map's features and render them as already synced
    pub async fn load_features(&mut self) -> Result<usize, StoreError> {
        let stored = self.sync.store().list_features(self.map_id).await?;
        let count = stored.len();

        for record in stored {
            let mut feature = Feature::persisted(record.id, record.geometry, record.properties);
            feature.map_id = Some(self.map_id);
            match self.layer.register(feature) {
                Ok(key) => self.sync.track(key, record.id),
                Err(err) => tracing::warn!("Skipping feature {}: {err}", record.id),
            }
        }

        tracing::info!("Loaded {count} features for map {}", self.map_id);
        Ok(count)
    }

    /// Commit the edit path as a new feature and start persisting it
    pub fn commit_feature(&mut self) {
        let key = match commit(&mut self.path, self.commit_mode, &mut self.layer) {
            Ok(Some(key)) => key,
            Ok(None) => {
                tracing::debug!("Nothing to commit");
                return;
            }
            Err(err) => {
                tracing::warn!("Could not add feature to the layer: {err}");
                return;
            }
        };

        let Some(feature) = self.layer.get_mut(key) else {
            return;
        };
        feature.map_id = Some(self.map_id);
        feature.user_id = self.context.get().user_id;

        tracing::info!("Committed {:?} feature {key}", feature.geometry.kind());
        self.status.begin_save();
        self.sync.create(feature);
    }

    /// Delete the selected feature, if any.
    ///
    /// The feature leaves the layer immediately. Its pending metadata is not
    /// flushed; the delete supersedes it.
    pub fn delete_selected(&mut self) {
        let Some(key) = self.selection.take() else {
            tracing::debug!("Delete with nothing selected");
            return;
        };
        self.editor.clear();
        self.selection_hooks.changed(Some(key), None);
        self.selection_hooks.selected(None);

        let Some(feature) = self.layer.remove(key) else {
            return;
        };
        tracing::info!("Deleted feature {key}");
        if self.sync.delete(feature).is_ok() {
            self.status.begin_save();
        }
    }

    /// React to a settled store operation
    pub fn apply_sync_event(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::Created { key, id } => {
                if !self.layer.set_remote_id(*key, *id) {
                    tracing::debug!("Feature {key} was removed before its create landed");
                }
                self.status.finish_save(true);
            }
            SyncEvent::CreateFailed { key, error } => {
                tracing::error!("Failed to create feature {key}: {error}");
                self.discard(*key);
                self.status.finish_save(false);
                self.status.alert(settings::text::CREATE_FAILED);
            }
            SyncEvent::CreateVetoed { key } => {
                self.discard(*key);
                self.status.abandon_save();
            }
            SyncEvent::Updated { .. } | SyncEvent::Deleted { .. } => {
                self.status.finish_save(true);
            }
            SyncEvent::UpdateFailed { key, error } => {
                tracing::warn!("Failed to update feature {key}: {error}");
                self.status.finish_save(false);
            }
            SyncEvent::DeleteFailed { key, error } => {
                tracing::error!("Failed to delete feature {key}: {error}");
                self.status.finish_save(false);
                self.status.alert(settings::text::DELETE_FAILED);
            }
            SyncEvent::DeleteVetoed { feature } => {
                let mut feature = feature.clone();
                feature.remote_id = feature.remote_id.or(self.sync.remote_id(feature.key));
                if let Err(err) = self.layer.register(feature.clone()) {
                    tracing::warn!("Could not restore feature {}: {err}", feature.key);
                }
                self.status.abandon_save();
            }
        }

        // Work dropped behind a failed create never reports back.
        if self.sync.is_idle() {
            self.status.settle();
        }
    }

    /// Apply every sync result that has already arrived
    pub fn poll_sync(&mut self) -> usize {
        let events = self.sync.poll_completions();
        for event in &events {
            self.apply_sync_event(event);
        }
        events.len()
    }

    /// Wait for the next sync result and apply it. Cancel safe.
    pub async fn next_sync_event(&mut self) -> SyncEvent {
        let event = self.sync.next_event().await;
        self.apply_sync_event(&event);
        event
    }

    /// Wait until every queued store call has settled
    pub async fn settle(&mut self) {
        while !self.sync.is_idle() {
            self.next_sync_event().await;
        }
    }

    /// Remove a feature whose create did not land
    fn discard(&mut self, key: FeatureKey) {
        if self.selection.contains(key) {
            self.selection.take();
            self.editor.clear();
            self.selection_hooks.changed(Some(key), None);
            self.selection_hooks.selected(None);
        }
        self.layer.remove(key);
    }
}
