// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! The annotated map feature

use super::geometry::Geometry;
use super::ids::{FeatureId, FeatureKey, MapId, UserId};
use serde::{Deserialize, Serialize};

/// Human-editable feature metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl FeatureProperties {
    /// Properties with the given name and description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A single annotated geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Local identity inside the rendered layer
    pub key: FeatureKey,
    /// Durable identity, absent until the remote store confirms creation
    pub remote_id: Option<FeatureId>,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
    pub user_id: Option<UserId>,
    pub map_id: Option<MapId>,
}

impl Feature {
    /// A freshly committed feature: blank metadata, no durable id
    pub fn committed(geometry: Geometry) -> Self {
        Self {
            key: FeatureKey::next(),
            remote_id: None,
            geometry,
            properties: FeatureProperties::default(),
            user_id: None,
            map_id: None,
        }
    }

    /// A feature loaded from the store, already durable
    pub fn persisted(id: FeatureId, geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            key: FeatureKey::next(),
            remote_id: Some(id),
            geometry,
            properties,
            user_id: None,
            map_id: None,
        }
    }

    /// Whether the store has assigned this feature an id
    pub fn is_durable(&self) -> bool {
        self.remote_id.is_some()
    }
}
