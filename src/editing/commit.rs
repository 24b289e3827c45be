// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Turning a finished edit path into a feature on the layer

use super::edit_path::EditPath;
use super::edit_types::CommitMode;
use crate::components::{FeatureSink, LayerError};
use crate::model::{Feature, FeatureKey, Geometry};

/// Convert `path` into the primitive selected by `mode`
pub fn convert(path: &EditPath, mode: CommitMode) -> Option<Geometry> {
    match mode {
        CommitMode::Marker => path.to_marker(),
        CommitMode::Polyline => path.to_polyline(),
        CommitMode::Polygon => path.to_polygon(),
    }
}

/// Commit `path` as a new feature registered with `sink`.
///
/// Returns `Ok(None)` without touching anything when the path is empty.
/// The path is cleared only once registration succeeds; on error it is left
/// exactly as it was so no drawing work is lost.
pub fn commit(
    path: &mut EditPath,
    mode: CommitMode,
    sink: &mut impl FeatureSink,
) -> Result<Option<FeatureKey>, LayerError> {
    let Some(geometry) = convert(path, mode) else {
        return Ok(None);
    };

    let key = sink.register(Feature::committed(geometry))?;
    path.clear();
    Ok(Some(key))
}
