// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Map feature data model

pub mod feature;
pub mod geometry;
pub mod ids;
pub mod view;

pub use feature::{Feature, FeatureProperties};
pub use geometry::{Geometry, GeometryKind, Point};
pub use ids::{FeatureId, FeatureKey, MapId, UserId};
pub use view::{View, ViewHandle};
