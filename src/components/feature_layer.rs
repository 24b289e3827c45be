// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! The rendered feature layer.
//!
//! Owns the in-memory representation of every feature on the map. Insertion
//! order doubles as z-order: the last feature is drawn on top, which is also
//! the one a click hits first. Hit testing runs in planar lng/lat space using
//! `kurbo`, which is accurate enough at click tolerances.

use crate::model::{Feature, FeatureId, FeatureKey, Geometry, Point};
use indexmap::IndexMap;
use kurbo::{BezPath, Line, ParamCurveNearest, Shape};

/// Error registering a feature with a layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("feature {0} is already on the layer")]
    Duplicate(FeatureKey),

    #[error("layer rejected feature: {0}")]
    Rejected(String),
}

/// Anything a committed primitive can be registered with
pub trait FeatureSink {
    fn register(&mut self, feature: Feature) -> Result<FeatureKey, LayerError>;
}

/// Features currently rendered on the map, bottom to top
#[derive(Debug, Clone, Default)]
pub struct FeatureLayer {
    features: IndexMap<FeatureKey, Feature>,
}

impl FeatureLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Whether `key` is rendered
    pub fn contains(&self, key: FeatureKey) -> bool {
        self.features.contains_key(&key)
    }

    /// The rendered feature for `key`
    pub fn get(&self, key: FeatureKey) -> Option<&Feature> {
        self.features.get(&key)
    }

    /// Mutable access to a rendered feature
    pub fn get_mut(&mut self, key: FeatureKey) -> Option<&mut Feature> {
        self.features.get_mut(&key)
    }

    /// Features bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Remove a feature, keeping the stacking order of the rest
    pub fn remove(&mut self, key: FeatureKey) -> Option<Feature> {
        self.features.shift_remove(&key)
    }

    /// Raise a feature above all its siblings
    pub fn bring_to_front(&mut self, key: FeatureKey) -> bool {
        let Some(index) = self.features.get_index_of(&key) else {
            return false;
        };
        let last = self.features.len() - 1;
        self.features.move_index(index, last);
        true
    }

    /// Attach the durable id the store assigned
    pub fn set_remote_id(&mut self, key: FeatureKey, id: FeatureId) -> bool {
        match self.features.get_mut(&key) {
            Some(feature) => {
                feature.remote_id = Some(id);
                true
            }
            None => false,
        }
    }

    /// Top-most feature under `point`
    ///
    /// Polygons are hit anywhere inside their ring; lines and markers within
    /// `tolerance` degrees.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<FeatureKey> {
        let click = point.to_kurbo();
        self.features
            .values()
            .rev()
            .find(|feature| geometry_hit(&feature.geometry, click, tolerance))
            .map(|feature| feature.key)
    }
}

impl FeatureSink for FeatureLayer {
    fn register(&mut self, feature: Feature) -> Result<FeatureKey, LayerError> {
        let key = feature.key;
        if self.features.contains_key(&key) {
            return Err(LayerError::Duplicate(key));
        }
        self.features.insert(key, feature);
        Ok(key)
    }
}

fn geometry_hit(geometry: &Geometry, click: kurbo::Point, tolerance: f64) -> bool {
    match geometry {
        Geometry::Marker(anchor) => anchor.to_kurbo().distance(click) <= tolerance,
        Geometry::Polyline(points) => near_polyline(points, click, tolerance, false),
        Geometry::Polygon(points) => {
            if points.len() >= 3 && polygon_path(points).contains(click) {
                return true;
            }
            near_polyline(points, click, tolerance, true)
        }
    }
}

fn near_polyline(points: &[Point], click: kurbo::Point, tolerance: f64, closed: bool) -> bool {
    match points {
        [] => false,
        [single] => single.to_kurbo().distance(click) <= tolerance,
        _ => {
            let tolerance_sq = tolerance * tolerance;
            let closing = closed.then(|| (points[points.len() - 1], points[0]));
            points
                .windows(2)
                .map(|pair| (pair[0], pair[1]))
                .chain(closing)
                .any(|(a, b)| {
                    let segment = Line::new(a.to_kurbo(), b.to_kurbo());
                    segment.nearest(click, 1e-9).distance_sq <= tolerance_sq
                })
        }
    }
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(points[0].to_kurbo());
    for point in &points[1..] {
        path.line_to(point.to_kurbo());
    }
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 0.01;

    fn p(lat: f64, lng: f64) -> Point {
        Point::new(lat, lng)
    }

    fn square() -> Geometry {
        Geometry::Polygon(vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)])
    }

    fn add(layer: &mut FeatureLayer, geometry: Geometry) -> FeatureKey {
        layer.register(Feature::committed(geometry)).unwrap()
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut layer = FeatureLayer::new();
        let feature = Feature::committed(Geometry::Marker(p(0.0, 0.0)));
        layer.register(feature.clone()).unwrap();
        assert_eq!(layer.register(feature.clone()), Err(LayerError::Duplicate(feature.key)));
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn polygon_hit_inside_not_outside() {
        let mut layer = FeatureLayer::new();
        let key = add(&mut layer, square());
        assert_eq!(layer.hit_test(p(0.5, 0.5), TOL), Some(key));
        assert_eq!(layer.hit_test(p(2.0, 2.0), TOL), None);
    }

    #[test]
    fn polyline_hit_near_segment() {
        let mut layer = FeatureLayer::new();
        let key = add(&mut layer, Geometry::Polyline(vec![p(0.0, 0.0), p(0.0, 1.0)]));
        assert_eq!(layer.hit_test(p(0.005, 0.5), TOL), Some(key));
        assert_eq!(layer.hit_test(p(0.5, 0.5), TOL), None);
    }

    #[test]
    fn marker_hit_within_tolerance() {
        let mut layer = FeatureLayer::new();
        let key = add(&mut layer, Geometry::Marker(p(10.0, 10.0)));
        assert_eq!(layer.hit_test(p(10.0, 10.005), TOL), Some(key));
        assert_eq!(layer.hit_test(p(10.0, 10.5), TOL), None);
    }

    #[test]
    fn top_most_feature_wins() {
        let mut layer = FeatureLayer::new();
        let bottom = add(&mut layer, square());
        let top = add(&mut layer, square());
        assert_eq!(layer.hit_test(p(0.5, 0.5), TOL), Some(top));

        assert!(layer.bring_to_front(bottom));
        assert_eq!(layer.hit_test(p(0.5, 0.5), TOL), Some(bottom));
    }

    #[test]
    fn remove_keeps_order_of_others() {
        let mut layer = FeatureLayer::new();
        let a = add(&mut layer, Geometry::Marker(p(0.0, 0.0)));
        let b = add(&mut layer, Geometry::Marker(p(1.0, 1.0)));
        let c = add(&mut layer, Geometry::Marker(p(2.0, 2.0)));

        assert!(layer.remove(b).is_some());
        let order: Vec<_> = layer.iter().map(|f| f.key).collect();
        assert_eq!(order, vec![a, c]);
        assert!(layer.remove(b).is_none());
    }

    #[test]
    fn set_remote_id_on_missing_feature_is_false() {
        let mut layer = FeatureLayer::new();
        let key = add(&mut layer, Geometry::Marker(p(0.0, 0.0)));
        assert!(layer.set_remote_id(key, FeatureId(9)));
        assert_eq!(layer.get(key).unwrap().remote_id, Some(FeatureId(9)));

        layer.remove(key);
        assert!(!layer.set_remote_id(key, FeatureId(9)));
    }
}
