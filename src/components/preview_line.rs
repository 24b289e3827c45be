// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Live preview polyline drawn through the in-progress edit path

use crate::model::Point;

/// Rendered preview of the path under construction
///
/// Holds exactly what is currently on screen. The renderer reads
/// `vertices()` and compares `revision()` to know when to redraw.
#[derive(Debug, Clone, Default)]
pub struct PreviewLine {
    vertices: Vec<Point>,
    revision: u64,
}

impl PreviewLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the drawn line with one through `points`, in order
    pub fn redraw(&mut self, points: &[Point]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(points);
        self.revision += 1;
    }

    /// Vertices the line currently passes through
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Bumped on every redraw
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
