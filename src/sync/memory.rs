// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! In-process [`FeatureStore`] used for offline editing and in tests.
//!
//! Besides holding features, the store keeps a log of every call it
//! receives, can be told to fail a kind of operation, and can hold a kind of
//! operation at a gate until released. The gate is what lets tests observe
//! ordering between a slow create and the calls queued behind it.

use super::store::{FeaturePatch, FeatureStore, NewFeature, StoreError, StoredFeature};
use crate::model::{FeatureId, FeatureProperties, Geometry, MapId, View};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Semaphore;

/// Kind of store operation, for failure injection and gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
    UpdateView,
}

/// A call as the store received it
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List(MapId),
    Create(NewFeature),
    Update(FeatureId, FeaturePatch),
    Delete(FeatureId),
    UpdateView(MapId, View),
}

impl StoreCall {
    /// Which operation this call was
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::List(_) => StoreOp::List,
            StoreCall::Create(_) => StoreOp::Create,
            StoreCall::Update(..) => StoreOp::Update,
            StoreCall::Delete(_) => StoreOp::Delete,
            StoreCall::UpdateView(..) => StoreOp::UpdateView,
        }
    }
}

#[derive(Debug)]
struct StoredRecord {
    map_id: Option<MapId>,
    feature: StoredFeature,
}

#[derive(Debug)]
struct MemoryState {
    next_id: i64,
    features: IndexMap<FeatureId, StoredRecord>,
    views: HashMap<MapId, View>,
    calls: Vec<StoreCall>,
    failing: HashSet<StoreOp>,
    gates: HashMap<StoreOp, Arc<Semaphore>>,
}

/// Feature store living entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                next_id: 1,
                features: IndexMap::new(),
                views: HashMap::new(),
                calls: Vec::new(),
                failing: HashSet::new(),
                gates: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("MemoryStore mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Seed a feature on `map`, returning its id
    pub fn insert(
        &self,
        map: MapId,
        geometry: Geometry,
        properties: FeatureProperties,
    ) -> FeatureId {
        let mut state = self.lock();
        let id = FeatureId(state.next_id);
        state.next_id += 1;
        state.features.insert(
            id,
            StoredRecord {
                map_id: Some(map),
                feature: StoredFeature {
                    id,
                    geometry,
                    properties,
                },
            },
        );
        id
    }

    /// The stored record for `id`
    pub fn feature(&self, id: FeatureId) -> Option<StoredFeature> {
        self.lock().features.get(&id).map(|r| r.feature.clone())
    }

    /// Number of stored features
    pub fn feature_count(&self) -> usize {
        self.lock().features.len()
    }

    /// Last view saved for `map`
    pub fn map_view(&self, map: MapId) -> Option<View> {
        self.lock().views.get(&map).copied()
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Calls of one kind, in arrival order
    pub fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .cloned()
            .collect()
    }

    /// Make every following `op` fail until [`MemoryStore::recover`]
    pub fn fail(&self, op: StoreOp) {
        self.lock().failing.insert(op);
    }

    /// Stop failing `op`
    pub fn recover(&self, op: StoreOp) {
        self.lock().failing.remove(&op);
    }

    /// Hold every following `op` after it is logged, until released
    pub fn hold(&self, op: StoreOp) {
        self.lock()
            .gates
            .entry(op)
            .or_insert_with(|| Arc::new(Semaphore::new(0)));
    }

    /// Let every held and future `op` through
    pub fn release(&self, op: StoreOp) {
        if let Some(gate) = self.lock().gates.remove(&op) {
            gate.close();
        }
    }

    /// Log the call, then wait at its gate if one is set
    async fn enter(&self, call: StoreCall) -> Result<(), StoreError> {
        let op = call.op();
        let gate = {
            let mut state = self.lock();
            state.calls.push(call);
            state.gates.get(&op).cloned()
        };

        if let Some(gate) = gate {
            // A closed semaphore is the release signal.
            let _ = gate.acquire().await;
        }

        if self.lock().failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("{op:?} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl FeatureStore for MemoryStore {
    async fn list_features(&self, map: MapId) -> Result<Vec<StoredFeature>, StoreError> {
        self.enter(StoreCall::List(map)).await?;
        Ok(self
            .lock()
            .features
            .values()
            .filter(|record| record.map_id == Some(map))
            .map(|record| record.feature.clone())
            .collect())
    }

    async fn create_feature(&self, feature: NewFeature) -> Result<FeatureId, StoreError> {
        self.enter(StoreCall::Create(feature.clone())).await?;
        let mut state = self.lock();
        let id = FeatureId(state.next_id);
        state.next_id += 1;
        state.features.insert(
            id,
            StoredRecord {
                map_id: feature.map_id,
                feature: StoredFeature {
                    id,
                    geometry: feature.geometry,
                    properties: feature.properties,
                },
            },
        );
        Ok(id)
    }

    async fn update_feature(&self, id: FeatureId, patch: FeaturePatch) -> Result<(), StoreError> {
        self.enter(StoreCall::Update(id, patch.clone())).await?;
        let mut state = self.lock();
        let record = state
            .features
            .get_mut(&id)
            .ok_or(StoreError::FeatureNotFound(id))?;
        if let Some(properties) = patch.properties {
            record.feature.properties = properties;
        }
        if let Some(geometry) = patch.geometry {
            record.feature.geometry = geometry;
        }
        Ok(())
    }

    async fn delete_feature(&self, id: FeatureId) -> Result<(), StoreError> {
        self.enter(StoreCall::Delete(id)).await?;
        self.lock()
            .features
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(StoreError::FeatureNotFound(id))
    }

    async fn update_map_view(&self, map: MapId, view: View) -> Result<(), StoreError> {
        self.enter(StoreCall::UpdateView(map, view)).await?;
        self.lock().views.insert(map, view);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn new_marker(map: MapId) -> NewFeature {
        NewFeature {
            user_id: None,
            map_id: Some(map),
            geometry: Geometry::Marker(Point::new(1.0, 1.0)),
            properties: FeatureProperties::default(),
        }
    }

    #[tokio::test]
    async fn create_update_delete_roundtrip() {
        let store = MemoryStore::new();
        let id = store.create_feature(new_marker(MapId(1))).await.unwrap();

        store
            .update_feature(id, FeaturePatch::properties(FeatureProperties::new("Tree", "Oak")))
            .await
            .unwrap();
        assert_eq!(store.feature(id).unwrap().properties.name, "Tree");

        store.delete_feature(id).await.unwrap();
        assert_eq!(store.feature_count(), 0);
        assert!(matches!(
            store.delete_feature(id).await,
            Err(StoreError::FeatureNotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_scoped_to_map() {
        let store = MemoryStore::new();
        store.insert(MapId(1), Geometry::Marker(Point::new(0.0, 0.0)), FeatureProperties::default());
        store.insert(MapId(2), Geometry::Marker(Point::new(0.0, 0.0)), FeatureProperties::default());

        assert_eq!(store.list_features(MapId(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn injected_failure_is_logged_and_returned() {
        let store = MemoryStore::new();
        store.fail(StoreOp::Create);
        assert!(store.create_feature(new_marker(MapId(1))).await.is_err());
        assert_eq!(store.calls_of(StoreOp::Create).len(), 1);
        assert_eq!(store.feature_count(), 0);

        store.recover(StoreOp::Create);
        assert!(store.create_feature(new_marker(MapId(1))).await.is_ok());
    }

    #[tokio::test]
    async fn held_call_waits_for_release() {
        let store = MemoryStore::new();
        store.hold(StoreOp::Create);

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.create_feature(new_marker(MapId(1))).await }
        });
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.calls_of(StoreOp::Create).len(), 1);
        assert_eq!(store.feature_count(), 0);

        store.release(StoreOp::Create);
        assert!(task.await.unwrap().is_ok());
        assert_eq!(store.feature_count(), 1);
    }
}
