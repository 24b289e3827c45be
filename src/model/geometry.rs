// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! Committed geometry primitives and their GeoJSON wire shape.
//!
//! In memory a `Geometry` holds plain lat/lng vertices in insertion order.
//! On the wire it follows GeoJSON: positions are `[lng, lat]`, a marker is a
//! `Point`, a polyline is a `LineString`, and a polygon is a `Polygon` whose
//! single ring is explicitly closed (first position repeated at the end).
//! The closing position is stripped again on the way back in, so a polygon
//! drawn with three clicks stays three vertices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar point for hit testing (x = lng, y = lat)
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.lng, self.lat)
    }

    fn to_position(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    fn from_position([lng, lat]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Which primitive a geometry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Marker,
    Polyline,
    Polygon,
}

/// A committed geometry primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeoJsonGeometry", try_from = "GeoJsonGeometry")]
pub enum Geometry {
    /// A single anchored point
    Marker(Point),
    /// An open line through the vertices in order
    Polyline(Vec<Point>),
    /// A closed ring through the vertices in order (closing vertex implicit)
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Which primitive this is
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Marker(_) => GeometryKind::Marker,
            Geometry::Polyline(_) => GeometryKind::Polyline,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// All vertices in insertion order
    pub fn vertices(&self) -> &[Point] {
        match self {
            Geometry::Marker(point) => std::slice::from_ref(point),
            Geometry::Polyline(points) | Geometry::Polygon(points) => points,
        }
    }
}

/// GeoJSON geometry object as exchanged with the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeoJsonGeometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    Polygon(Vec<Vec<[f64; 2]>>),
}

/// Error decoding a GeoJSON geometry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon has no rings")]
    EmptyPolygon,
}

impl From<Geometry> for GeoJsonGeometry {
    fn from(geometry: Geometry) -> Self {
        match geometry {
            Geometry::Marker(point) => GeoJsonGeometry::Point(point.to_position()),
            Geometry::Polyline(points) => {
                GeoJsonGeometry::LineString(points.into_iter().map(Point::to_position).collect())
            }
            Geometry::Polygon(points) => {
                let mut ring: Vec<[f64; 2]> = points.iter().map(|p| p.to_position()).collect();
                if let Some(&first) = ring.first() {
                    ring.push(first);
                }
                GeoJsonGeometry::Polygon(vec![ring])
            }
        }
    }
}

impl TryFrom<GeoJsonGeometry> for Geometry {
    type Error = GeometryError;

    fn try_from(value: GeoJsonGeometry) -> Result<Self, Self::Error> {
        match value {
            GeoJsonGeometry::Point(position) => Ok(Geometry::Marker(Point::from_position(position))),
            GeoJsonGeometry::LineString(positions) => Ok(Geometry::Polyline(
                positions.into_iter().map(Point::from_position).collect(),
            )),
            GeoJsonGeometry::Polygon(rings) => {
                // Holes are never produced by the editor; only the outer ring matters
                let mut ring = rings.into_iter().next().ok_or(GeometryError::EmptyPolygon)?;
                if ring.len() > 1 && ring.first() == ring.last() {
                    ring.pop();
                }
                Ok(Geometry::Polygon(
                    ring.into_iter().map(Point::from_position).collect(),
                ))
            }
        }
    }
}
