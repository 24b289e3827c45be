// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! The remote feature store seam

use crate::model::{FeatureId, FeatureProperties, Geometry, MapId, UserId, View};
use async_trait::async_trait;

/// Error talking to the remote store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feature {0} not found")]
    FeatureNotFound(FeatureId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A feature as the store returns it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFeature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// Payload for creating a feature
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeature {
    pub user_id: Option<UserId>,
    pub map_id: Option<MapId>,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// Partial feature update; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturePatch {
    pub properties: Option<FeatureProperties>,
    pub geometry: Option<Geometry>,
}

impl FeaturePatch {
    /// Patch that replaces only the properties
    pub fn properties(properties: FeatureProperties) -> Self {
        Self {
            properties: Some(properties),
            geometry: None,
        }
    }
}

/// Remote source of truth for features and map views
///
/// Implementations are shared between the editor and its spawned sync
/// tasks, so they must be `Send + Sync`. No transactional guarantees are
/// assumed across calls.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Every feature on `map`
    async fn list_features(&self, map: MapId) -> Result<Vec<StoredFeature>, StoreError>;

    /// Create a feature and return its durable id
    async fn create_feature(&self, feature: NewFeature) -> Result<FeatureId, StoreError>;

    async fn update_feature(&self, id: FeatureId, patch: FeaturePatch) -> Result<(), StoreError>;

    async fn delete_feature(&self, id: FeatureId) -> Result<(), StoreError>;

    /// Persist the viewport of `map`
    async fn update_map_view(&self, map: MapId, view: View) -> Result<(), StoreError>;
}
