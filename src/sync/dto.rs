// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! JSON bodies exchanged with the REST backend

use super::store::{FeaturePatch, NewFeature, StoredFeature};
use crate::model::{FeatureId, FeatureProperties, Geometry, MapId, UserId, View};
use serde::{Deserialize, Serialize};

/// GeoJSON object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
    FeatureCollection,
}

/// GeoJSON feature with the editor's properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    #[serde(default)]
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

/// `GET /maps/{id}/features` element and `POST /features` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDto {
    pub id: FeatureId,
    pub geojson: GeoJsonFeature,
}

impl From<FeatureDto> for StoredFeature {
    fn from(dto: FeatureDto) -> Self {
        Self {
            id: dto.id,
            geometry: dto.geojson.geometry,
            properties: dto.geojson.properties,
        }
    }
}

/// `POST /features` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureRequest {
    pub user_id: Option<UserId>,
    pub map_id: Option<MapId>,
    pub geojson: GeoJsonFeature,
}

impl From<NewFeature> for CreateFeatureRequest {
    fn from(feature: NewFeature) -> Self {
        Self {
            user_id: feature.user_id,
            map_id: feature.map_id,
            geojson: GeoJsonFeature {
                kind: FeatureType::Feature,
                properties: feature.properties,
                geometry: feature.geometry,
            },
        }
    }
}

/// Partial GeoJSON for `PATCH /features/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoJsonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<FeatureProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FeatureType>,
}

/// `PATCH /features/{id}` body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateFeatureRequest {
    pub geojson: GeoJsonPatch,
}

impl From<FeaturePatch> for UpdateFeatureRequest {
    fn from(patch: FeaturePatch) -> Self {
        Self {
            geojson: GeoJsonPatch {
                properties: patch.properties,
                geometry: patch.geometry,
                kind: None,
            },
        }
    }
}

/// `PATCH /maps/{id}` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMapRequest {
    pub view: View,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;
    use serde_json::json;

    #[test]
    fn create_request_shape() {
        let request = CreateFeatureRequest::from(NewFeature {
            user_id: Some(UserId(1)),
            map_id: Some(MapId(2)),
            geometry: Geometry::Marker(Point::new(10.0, 20.0)),
            properties: FeatureProperties::default(),
        });

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "userId": 1,
                "mapId": 2,
                "geojson": {
                    "type": "Feature",
                    "properties": {"name": "", "description": ""},
                    "geometry": {"type": "Point", "coordinates": [20.0, 10.0]}
                }
            })
        );
    }

    #[test]
    fn property_patch_omits_geometry_and_type() {
        let request = UpdateFeatureRequest::from(FeaturePatch::properties(
            FeatureProperties::new("Gate", "North entrance"),
        ));
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"geojson": {"properties": {"name": "Gate", "description": "North entrance"}}})
        );
    }

    #[test]
    fn feature_list_decodes_with_extra_property_fields() {
        let dtos: Vec<FeatureDto> = serde_json::from_value(json!([
            {
                "id": 5,
                "geojson": {
                    "type": "Feature",
                    "properties": {"name": "Well", "description": "", "id": 5},
                    "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
                }
            }
        ]))
        .unwrap();

        let stored = StoredFeature::from(dtos[0].clone());
        assert_eq!(stored.id, FeatureId(5));
        assert_eq!(stored.properties.name, "Well");
    }

    #[test]
    fn map_view_body() {
        let body = UpdateMapRequest {
            view: View::new(Point::new(1.0, 2.0), 13.0),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"view": {"center": {"lat": 1.0, "lng": 2.0}, "zoom": 13.0}})
        );
    }
}
