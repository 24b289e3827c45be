// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! The in-progress path a user is drawing.
//!
//! Every mutation redraws the preview line so the screen never lags the
//! buffer. The `to_*` conversions are pure reads; on an empty buffer they
//! produce nothing.

use crate::components::PreviewLine;
use crate::model::{Geometry, Point};

/// Ordered, mutable sequence of points under construction
#[derive(Debug, Clone, Default)]
pub struct EditPath {
    points: Vec<Point>,
    preview: PreviewLine,
}

impl EditPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Placed vertices in insertion order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The provisional line through the placed vertices
    pub fn preview(&self) -> &PreviewLine {
        &self.preview
    }

    /// Append a point
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
        self.update_preview();
    }

    /// Drop the most recently pushed point (no-op when empty)
    pub fn pop(&mut self) -> Option<Point> {
        let popped = self.points.pop();
        self.update_preview();
        popped
    }

    /// Drop every point
    pub fn clear(&mut self) {
        self.points.clear();
        self.update_preview();
    }

    /// Marker anchored at the first pushed point
    pub fn to_marker(&self) -> Option<Geometry> {
        self.points.first().map(|&first| Geometry::Marker(first))
    }

    /// Open line through every point
    pub fn to_polyline(&self) -> Option<Geometry> {
        (!self.is_empty()).then(|| Geometry::Polyline(self.points.clone()))
    }

    /// Closed ring through every point
    pub fn to_polygon(&self) -> Option<Geometry> {
        (!self.is_empty()).then(|| Geometry::Polygon(self.points.clone()))
    }

    fn update_preview(&mut self) {
        self.preview.redraw(&self.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lng: f64) -> Point {
        Point::new(lat, lng)
    }

    #[test]
    fn new_path_is_empty() {
        let path = EditPath::new();
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut path = EditPath::new();
        assert_eq!(path.pop(), None);
        assert_eq!(path.len(), 0);
    }

    #[test]
    fn length_tracks_net_pushes_floored_at_zero() {
        // (op, expected length) where op: true = push, false = pop
        let script = [
            (true, 1),
            (true, 2),
            (false, 1),
            (false, 0),
            (false, 0),
            (true, 1),
            (true, 2),
            (true, 3),
            (false, 2),
        ];
        let mut path = EditPath::new();
        for (i, (push, expected)) in script.into_iter().enumerate() {
            if push {
                path.push(p(i as f64, 0.0));
            } else {
                path.pop();
            }
            assert_eq!(path.len(), expected, "after step {i}");
        }
        path.clear();
        assert_eq!(path.len(), 0);
        assert!(path.is_empty());
    }

    #[test]
    fn pop_removes_most_recent() {
        let mut path = EditPath::new();
        path.push(p(0.0, 0.0));
        path.push(p(1.0, 1.0));
        assert_eq!(path.pop(), Some(p(1.0, 1.0)));
        assert_eq!(path.points(), &[p(0.0, 0.0)]);
    }

    #[test]
    fn preview_follows_every_mutation() {
        let mut path = EditPath::new();
        path.push(p(0.0, 0.0));
        path.push(p(0.0, 1.0));
        assert_eq!(path.preview().vertices(), &[p(0.0, 0.0), p(0.0, 1.0)]);
        assert_eq!(path.preview().revision(), 2);

        path.pop();
        assert_eq!(path.preview().vertices(), &[p(0.0, 0.0)]);

        path.clear();
        assert!(path.preview().vertices().is_empty());
        assert_eq!(path.preview().revision(), 4);
    }

    #[test]
    fn marker_uses_first_point_regardless_of_length() {
        let mut path = EditPath::new();
        path.push(p(3.0, 4.0));
        for n in 1..6 {
            assert_eq!(path.to_marker(), Some(Geometry::Marker(p(3.0, 4.0))), "n = {n}");
            path.push(p(n as f64, -(n as f64)));
        }
    }

    #[test]
    fn empty_path_converts_to_nothing() {
        let path = EditPath::new();
        assert_eq!(path.to_marker(), None);
        assert_eq!(path.to_polyline(), None);
        assert_eq!(path.to_polygon(), None);
    }

    #[test]
    fn conversions_do_not_consume_points() {
        let mut path = EditPath::new();
        path.push(p(0.0, 0.0));
        path.push(p(0.0, 1.0));
        let _ = path.to_polygon();
        let _ = path.to_polyline();
        assert_eq!(path.len(), 2);
    }
}
