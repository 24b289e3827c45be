// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor surfaces: the rendered feature layer, the live preview line, the
//! status overlay, and the metadata editor

pub mod feature_layer;
pub mod metadata_editor;
pub mod preview_line;
pub mod status_indicator;

pub use feature_layer::{FeatureLayer, FeatureSink, LayerError};
pub use metadata_editor::{MetadataEditor, TextEditor};
pub use preview_line::PreviewLine;
pub use status_indicator::{SaveStatus, StatusIndicator};
