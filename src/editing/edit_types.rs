// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Interaction and commit modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which interaction table is active
///
/// Select mode: clicks pick features, keys act on the selection.
/// Edit mode: clicks add points to the edit path, keys shape and commit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Select,
    Edit,
}

impl MapMode {
    pub const ALL: [MapMode; 2] = [MapMode::Select, MapMode::Edit];

    /// Letter shown in the mode indicator
    pub fn indicator(self) -> char {
        match self {
            MapMode::Select => 'S',
            MapMode::Edit => 'E',
        }
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MapMode::Select => "select",
            MapMode::Edit => "edit",
        })
    }
}

/// Primitive an edit path becomes on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitMode {
    Marker,
    Polyline,
    Polygon,
}

impl CommitMode {
    /// Letter shown in the mode indicator
    pub fn indicator(self) -> char {
        match self {
            CommitMode::Marker => 'M',
            CommitMode::Polyline => 'L',
            CommitMode::Polygon => 'P',
        }
    }
}
