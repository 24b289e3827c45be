// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Ordered persistence of feature changes.
//!
//! Each feature gets its own queue. Only the head of a queue is ever in
//! flight, so a create always resolves before any update or delete queued
//! behind it is sent, and those later calls pick up the durable id the
//! create produced. Network work runs on spawned tasks which report back
//! through an unbounded channel; completions are applied on the editor loop
//! by [`FeatureSyncController::poll_completions`] or
//! [`FeatureSyncController::next_event`].

use super::store::{FeaturePatch, FeatureStore, NewFeature, StoreError};
use crate::editing::hooks::{FeatureHooks, HookFuture};
use crate::model::{Feature, FeatureId, FeatureKey};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Refusal to queue work for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Neither durable nor waiting on a create
    #[error("feature {0} has no durable id and no pending create")]
    Untracked(FeatureKey),
}

/// Queued persistence work for one feature
#[derive(Debug)]
enum SyncOp {
    Create(Feature),
    Update(FeaturePatch),
    Delete(Feature),
}

impl SyncOp {
    fn name(&self) -> &'static str {
        match self {
            SyncOp::Create(_) => "create",
            SyncOp::Update(_) => "update",
            SyncOp::Delete(_) => "delete",
        }
    }
}

/// What the editor must react to once an operation settles
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Created { key: FeatureKey, id: FeatureId },
    CreateFailed { key: FeatureKey, error: String },
    CreateVetoed { key: FeatureKey },
    Updated { key: FeatureKey },
    UpdateFailed { key: FeatureKey, error: String },
    Deleted { key: FeatureKey, id: FeatureId },
    DeleteFailed { key: FeatureKey, error: String },
    /// The delete hook refused; `feature` is the snapshot to restore
    DeleteVetoed { feature: Feature },
}

impl SyncEvent {
    /// The feature the event is about
    pub fn key(&self) -> FeatureKey {
        match self {
            SyncEvent::Created { key, .. }
            | SyncEvent::CreateFailed { key, .. }
            | SyncEvent::CreateVetoed { key }
            | SyncEvent::Updated { key }
            | SyncEvent::UpdateFailed { key, .. }
            | SyncEvent::Deleted { key, .. }
            | SyncEvent::DeleteFailed { key, .. } => *key,
            SyncEvent::DeleteVetoed { feature } => feature.key,
        }
    }
}

#[derive(Debug)]
enum TaskResult {
    Created(Result<FeatureId, StoreError>),
    CreateVetoed,
    Updated(Result<(), StoreError>),
    Deleted(FeatureId, Result<(), StoreError>),
    DeleteVetoed(Feature),
}

#[derive(Debug)]
struct SyncComplete {
    key: FeatureKey,
    result: TaskResult,
}

#[derive(Debug, Default)]
struct FeatureSync {
    remote_id: Option<FeatureId>,
    creating: bool,
    in_flight: bool,
    queue: VecDeque<SyncOp>,
}

/// Serializes store calls per feature and reports their outcomes
pub struct FeatureSyncController {
    store: Arc<dyn FeatureStore>,
    hooks: FeatureHooks,
    features: HashMap<FeatureKey, FeatureSync>,
    completion_tx: mpsc::UnboundedSender<SyncComplete>,
    completion_rx: mpsc::UnboundedReceiver<SyncComplete>,
}

impl std::fmt::Debug for FeatureSyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSyncController")
            .field("hooks", &self.hooks)
            .field("features", &self.features)
            .finish()
    }
}

impl FeatureSyncController {
    /// A controller with no tracked features, gating creates and deletes
    /// through `hooks`
    pub fn new(store: Arc<dyn FeatureStore>, hooks: FeatureHooks) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            store,
            hooks,
            features: HashMap::new(),
            completion_tx,
            completion_rx,
        }
    }

    /// The store every operation is sent to
    pub fn store(&self) -> &Arc<dyn FeatureStore> {
        &self.store
    }

    /// Register a feature the store already knows about
    pub fn track(&mut self, key: FeatureKey, id: FeatureId) {
        self.features.entry(key).or_default().remote_id = Some(id);
    }

    /// The durable id, once the store has assigned one
    pub fn remote_id(&self, key: FeatureKey) -> Option<FeatureId> {
        self.features.get(&key).and_then(|state| state.remote_id)
    }

    /// Whether a create for `key` has been queued but not yet resolved
    pub fn is_creating(&self, key: FeatureKey) -> bool {
        self.features.get(&key).is_some_and(|state| state.creating)
    }

    /// Operations waiting behind the in-flight one for `key`
    pub fn queued(&self, key: FeatureKey) -> usize {
        self.features.get(&key).map_or(0, |state| state.queue.len())
    }

    /// Number of features with a store call running
    pub fn in_flight(&self) -> usize {
        self.features.values().filter(|state| state.in_flight).count()
    }

    /// No work is queued or running
    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }

    /// Persist a newly committed feature
    pub fn create(&mut self, feature: &Feature) {
        let key = feature.key;
        let state = self.features.entry(key).or_default();
        state.creating = true;
        state.queue.push_back(SyncOp::Create(feature.clone()));
        tracing::debug!(key = %key, "sync.create queued");
        self.pump(key);
    }

    /// Persist a property or geometry change.
    ///
    /// Fails without queueing anything when the feature is neither durable
    /// nor waiting on its create.
    pub fn update(&mut self, key: FeatureKey, patch: FeaturePatch) -> Result<(), SyncError> {
        self.enqueue(key, SyncOp::Update(patch))
    }

    /// Remove a feature from the store
    pub fn delete(&mut self, feature: Feature) -> Result<(), SyncError> {
        self.enqueue(feature.key, SyncOp::Delete(feature))
    }

    fn enqueue(&mut self, key: FeatureKey, op: SyncOp) -> Result<(), SyncError> {
        let Some(state) = self
            .features
            .get_mut(&key)
            .filter(|state| state.remote_id.is_some() || state.creating)
        else {
            tracing::error!(key = %key, op = op.name(), "no durable id and no pending create, aborting");
            return Err(SyncError::Untracked(key));
        };

        tracing::debug!(key = %key, op = op.name(), "sync op queued");
        state.queue.push_back(op);
        self.pump(key);
        Ok(())
    }

    /// Start the head of `key`'s queue if nothing is in flight for it
    fn pump(&mut self, key: FeatureKey) {
        let Some(state) = self.features.get_mut(&key) else {
            return;
        };

        while !state.in_flight {
            let Some(op) = state.queue.pop_front() else {
                return;
            };

            let tx = self.completion_tx.clone();
            let store = self.store.clone();

            match op {
                SyncOp::Create(feature) => {
                    let gate = self.hooks.create_gate(&feature);
                    let new = NewFeature {
                        user_id: feature.user_id,
                        map_id: feature.map_id,
                        geometry: feature.geometry,
                        properties: feature.properties,
                    };
                    tokio::spawn(async move {
                        let result = if gate.await {
                            TaskResult::Created(store.create_feature(new).await)
                        } else {
                            TaskResult::CreateVetoed
                        };
                        let _ = tx.send(SyncComplete { key, result });
                    });
                }
                SyncOp::Update(patch) => {
                    let Some(id) = state.remote_id else {
                        tracing::error!(key = %key, "update reached the head of the queue without a durable id");
                        continue;
                    };
                    tokio::spawn(async move {
                        let result = TaskResult::Updated(store.update_feature(id, patch).await);
                        let _ = tx.send(SyncComplete { key, result });
                    });
                }
                SyncOp::Delete(mut feature) => {
                    let Some(id) = state.remote_id else {
                        tracing::error!(key = %key, "delete reached the head of the queue without a durable id");
                        continue;
                    };
                    // Queued before the create landed, the snapshot has no id yet.
                    feature.remote_id = Some(id);
                    let gate: HookFuture = self.hooks.delete_gate(&feature);
                    tokio::spawn(async move {
                        let result = if gate.await {
                            TaskResult::Deleted(id, store.delete_feature(id).await)
                        } else {
                            TaskResult::DeleteVetoed(feature)
                        };
                        let _ = tx.send(SyncComplete { key, result });
                    });
                }
            }
            state.in_flight = true;
        }
    }

    /// Apply every completion that has already arrived
    pub fn poll_completions(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(complete) = self.completion_rx.try_recv() {
            events.push(self.apply(complete));
        }
        events
    }

    /// Wait for the next completion and apply it.
    ///
    /// Cancel safe. Never resolves while the controller is idle.
    pub async fn next_event(&mut self) -> SyncEvent {
        loop {
            if let Some(complete) = self.completion_rx.recv().await {
                return self.apply(complete);
            }
        }
    }

    /// Run until nothing is queued or in flight, returning every event
    pub async fn settle(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while !self.is_idle() {
            events.push(self.next_event().await);
        }
        events
    }

    fn apply(&mut self, complete: SyncComplete) -> SyncEvent {
        let key = complete.key;
        if let Some(state) = self.features.get_mut(&key) {
            state.in_flight = false;
        }

        let event = match complete.result {
            TaskResult::Created(Ok(id)) => {
                tracing::debug!(key = %key, id = %id, "sync.create resolved");
                if let Some(state) = self.features.get_mut(&key) {
                    state.remote_id = Some(id);
                    state.creating = false;
                }
                SyncEvent::Created { key, id }
            }
            TaskResult::Created(Err(err)) => {
                tracing::warn!(key = %key, "create failed: {err}");
                self.abandon(key);
                SyncEvent::CreateFailed {
                    key,
                    error: err.to_string(),
                }
            }
            TaskResult::CreateVetoed => {
                tracing::debug!(key = %key, "create vetoed by hook");
                self.abandon(key);
                SyncEvent::CreateVetoed { key }
            }
            TaskResult::Updated(Ok(())) => SyncEvent::Updated { key },
            TaskResult::Updated(Err(err)) => {
                tracing::warn!(key = %key, "update failed: {err}");
                SyncEvent::UpdateFailed {
                    key,
                    error: err.to_string(),
                }
            }
            TaskResult::Deleted(id, result) => {
                self.forget(key);
                match result {
                    Ok(()) => SyncEvent::Deleted { key, id },
                    Err(err) => {
                        tracing::warn!(key = %key, id = %id, "delete failed: {err}");
                        SyncEvent::DeleteFailed {
                            key,
                            error: err.to_string(),
                        }
                    }
                }
            }
            TaskResult::DeleteVetoed(feature) => {
                tracing::debug!(key = %key, "delete vetoed by hook");
                SyncEvent::DeleteVetoed { feature }
            }
        };

        self.pump(key);
        event
    }

    /// Drop a feature whose create did not land, with everything queued
    /// behind it
    fn abandon(&mut self, key: FeatureKey) {
        if let Some(state) = self.features.remove(&key)
            && !state.queue.is_empty()
        {
            tracing::warn!(key = %key, dropped = state.queue.len(), "dropping ops queued behind a failed create");
        }
    }

    fn forget(&mut self, key: FeatureKey) {
        if let Some(state) = self.features.remove(&key)
            && !state.queue.is_empty()
        {
            tracing::warn!(key = %key, dropped = state.queue.len(), "dropping ops queued after delete");
        }
    }
}
