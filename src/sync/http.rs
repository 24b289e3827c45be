// Copyright 2025 the Carto Editor Authors
// SPDX-License-Identifier: Apache-2.0

//! REST implementation of [`FeatureStore`]

use super::dto::{CreateFeatureRequest, FeatureDto, UpdateFeatureRequest, UpdateMapRequest};
use super::store::{FeaturePatch, FeatureStore, NewFeature, StoreError, StoredFeature};
use crate::model::{FeatureId, MapId, View};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Feature store backed by the map API over HTTP
#[derive(Debug, Clone)]
pub struct HttpFeatureStore {
    client: Client,
    base_url: String,
}

impl HttpFeatureStore {
    /// Client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Same as [`HttpFeatureStore::new`] with a preconfigured client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// API root without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Map 404 on a feature route to [`StoreError::FeatureNotFound`]
fn check_feature(response: Response, id: FeatureId) -> Result<Response, StoreError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(StoreError::FeatureNotFound(id));
    }
    Ok(response.error_for_status()?)
}

#[async_trait]
impl FeatureStore for HttpFeatureStore {
    async fn list_features(&self, map: MapId) -> Result<Vec<StoredFeature>, StoreError> {
        let features: Vec<FeatureDto> = self
            .client
            .get(self.url(&format!("/maps/{map}/features")))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!("Loaded {} features for map {map}", features.len());
        Ok(features.into_iter().map(StoredFeature::from).collect())
    }

    async fn create_feature(&self, feature: NewFeature) -> Result<FeatureId, StoreError> {
        let created: FeatureDto = self
            .client
            .post(self.url("/features"))
            .json(&CreateFeatureRequest::from(feature))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(created.id)
    }

    async fn update_feature(&self, id: FeatureId, patch: FeaturePatch) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.url(&format!("/features/{id}")))
            .json(&UpdateFeatureRequest::from(patch))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        check_feature(response, id)?;
        Ok(())
    }

    async fn delete_feature(&self, id: FeatureId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/features/{id}")))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        check_feature(response, id)?;
        Ok(())
    }

    async fn update_map_view(&self, map: MapId, view: View) -> Result<(), StoreError> {
        self.client
            .patch(self.url(&format!("/maps/{map}")))
            .json(&UpdateMapRequest { view })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureProperties, Geometry, Point, UserId};
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// A request as the canned server received it
    #[derive(Debug)]
    struct Seen {
        method: String,
        path: String,
        body: Option<Value>,
    }

    fn reason(status: u16) -> &'static str {
        match status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    /// Answer one connection per reply, in order. `Value::Null` sends no body.
    async fn serve(replies: Vec<(u16, Value)>) -> (String, JoinHandle<Vec<Seen>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let mut seen = Vec::new();
            for (status, body) in replies {
                let (mut stream, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut stream).await);

                let body = if body.is_null() { String::new() } else { body.to_string() };
                let response = format!(
                    "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    reason(status),
                    body.len(),
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            seen
        });
        (base_url, server)
    }

    async fn read_request(stream: &mut TcpStream) -> Seen {
        let mut bytes = Vec::new();
        let mut buf = [0_u8; 4096];

        let (head_end, length) = loop {
            let read = stream.read(&mut buf).await.unwrap();
            assert!(read > 0, "connection closed inside the request head");
            bytes.extend_from_slice(&buf[..read]);

            if let Some(pos) = bytes.windows(4).position(|window| window == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&bytes[..pos]).to_string();
                let length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                break (pos + 4, length);
            }
        };

        while bytes.len() < head_end + length {
            let read = stream.read(&mut buf).await.unwrap();
            assert!(read > 0, "connection closed inside the request body");
            bytes.extend_from_slice(&buf[..read]);
        }

        let head = String::from_utf8_lossy(&bytes[..head_end]).to_string();
        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        let body = (length > 0)
            .then(|| serde_json::from_slice(&bytes[head_end..head_end + length]).unwrap());
        Seen { method, path, body }
    }

    fn store(base_url: String) -> HttpFeatureStore {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpFeatureStore::with_client(client, base_url)
    }

    fn feature_json(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "geojson": {
                "type": "Feature",
                "properties": {"name": name, "description": ""},
                "geometry": {"type": "Point", "coordinates": [2.0, 1.0]}
            }
        })
    }

    fn new_marker() -> NewFeature {
        NewFeature {
            user_id: Some(UserId(3)),
            map_id: Some(MapId(7)),
            geometry: Geometry::Marker(Point::new(1.0, 2.0)),
            properties: FeatureProperties::default(),
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let store = HttpFeatureStore::new("http://localhost:8080/api/");
        assert_eq!(store.base_url(), "http://localhost:8080/api");
        assert_eq!(
            store.url("/features/3"),
            "http://localhost:8080/api/features/3"
        );
    }

    #[tokio::test]
    async fn each_operation_uses_its_route() {
        let (base_url, server) = serve(vec![
            (200, json!([feature_json(5, "Well")])),
            (201, feature_json(6, "")),
            (204, Value::Null),
            (204, Value::Null),
            (200, json!({})),
        ])
        .await;
        let store = store(base_url);

        let listed = store.list_features(MapId(7)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, FeatureId(5));
        assert_eq!(listed[0].properties.name, "Well");

        store.create_feature(new_marker()).await.unwrap();
        store
            .update_feature(
                FeatureId(6),
                FeaturePatch::properties(FeatureProperties::new("Gate", "")),
            )
            .await
            .unwrap();
        store.delete_feature(FeatureId(6)).await.unwrap();
        store
            .update_map_view(MapId(7), View::new(Point::new(1.0, 2.0), 12.0))
            .await
            .unwrap();

        let seen = server.await.unwrap();
        let routes: Vec<(&str, &str)> = seen
            .iter()
            .map(|request| (request.method.as_str(), request.path.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("GET", "/api/maps/7/features"),
                ("POST", "/api/features"),
                ("PATCH", "/api/features/6"),
                ("DELETE", "/api/features/6"),
                ("PATCH", "/api/maps/7"),
            ]
        );
        assert_eq!(
            seen[2].body,
            Some(json!({"geojson": {"properties": {"name": "Gate", "description": ""}}}))
        );
        assert_eq!(seen[3].body, None);
        assert_eq!(
            seen[4].body,
            Some(json!({"view": {"center": {"lat": 1.0, "lng": 2.0}, "zoom": 12.0}}))
        );
    }

    #[tokio::test]
    async fn create_returns_assigned_id() {
        let (base_url, server) = serve(vec![(201, feature_json(42, ""))]).await;

        let id = store(base_url).create_feature(new_marker()).await.unwrap();
        assert_eq!(id, FeatureId(42));

        let seen = server.await.unwrap();
        let body = seen[0].body.as_ref().unwrap();
        assert_eq!(body["userId"], json!(3));
        assert_eq!(body["mapId"], json!(7));
        assert_eq!(
            body["geojson"]["geometry"],
            json!({"type": "Point", "coordinates": [2.0, 1.0]})
        );
    }

    #[tokio::test]
    async fn missing_feature_is_not_found() {
        let (base_url, _server) = serve(vec![
            (404, json!({"error": "not found"})),
            (404, json!({"error": "not found"})),
        ])
        .await;
        let store = store(base_url);

        let patched = store.update_feature(FeatureId(9), FeaturePatch::default()).await;
        assert!(matches!(patched, Err(StoreError::FeatureNotFound(id)) if id == FeatureId(9)));

        let deleted = store.delete_feature(FeatureId(9)).await;
        assert!(matches!(deleted, Err(StoreError::FeatureNotFound(id)) if id == FeatureId(9)));
    }

    #[tokio::test]
    async fn server_errors_surface_as_http() {
        let (base_url, _server) = serve(vec![(500, json!({})), (500, json!({}))]).await;
        let store = store(base_url);

        let listed = store.list_features(MapId(1)).await;
        assert!(matches!(
            listed,
            Err(StoreError::Http(err)) if err.status() == Some(StatusCode::INTERNAL_SERVER_ERROR)
        ));

        let updated = store.update_feature(FeatureId(1), FeaturePatch::default()).await;
        assert!(matches!(updated, Err(StoreError::Http(_))));
    }
}
