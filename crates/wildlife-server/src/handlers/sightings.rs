//! Sighting endpoint
//!
//! A single POST route; the `purpose` field of the body selects the operation.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::{debug, info, warn};
use wildlife_core::{ApiResponse, ServerMessage, SightingRequest, PURPOSES};

pub const INVALID_PURPOSE: &str =
    "Invalid purpose. Expected 'newRecord', 'retrieveAll' or 'attachImages'";

pub async fn dispatch(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|e| {
        warn!("Rejected request body: {}", e);
        match e {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                ApiError::BadRequest(INVALID_PURPOSE.to_string())
            }
            other => ApiError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    })?;

    let purpose = body.get("purpose").and_then(Value::as_str).unwrap_or_default();
    if !PURPOSES.contains(&purpose) {
        warn!("Invalid purpose: {:?}", purpose);
        return Err(ApiError::BadRequest(INVALID_PURPOSE.to_string()));
    }
    let purpose = purpose.to_string();

    let request: SightingRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid {} request: {}", purpose, e)))?;

    match request {
        SightingRequest::NewRecord {
            sighting_data,
            images,
        } => {
            info!("Creating new wildlife sighting record");
            let sighting = state
                .service
                .create(sighting_data, &images)
                .await
                .map_err(|e| ApiError::from_service("Error creating wildlife sighting", e))?;

            let image_count = sighting.images.len();
            let delivered = state
                .conn_manager
                .broadcast(ServerMessage::NewSighting {
                    data: sighting.clone(),
                    image_count,
                })
                .await;
            debug!("New sighting broadcast to {} client(s)", delivered);

            let message = if image_count > 0 {
                format!(
                    "Wildlife sighting recorded successfully with {} image(s)",
                    image_count
                )
            } else {
                "Wildlife sighting recorded successfully".to_string()
            };
            let image_ids = sighting.image_ids();
            respond(ApiResponse::ok(message, sighting).with_image_ids(image_ids))
        }
        SightingRequest::RetrieveAll => {
            info!("Retrieving all wildlife sightings");
            let sightings = state
                .service
                .list_all()
                .await
                .map_err(|e| ApiError::from_service("Error retrieving wildlife sightings", e))?;

            respond(ApiResponse::ok(
                "Wildlife sightings retrieved successfully",
                sightings,
            ))
        }
        SightingRequest::AttachImages {
            sighting_id,
            images,
            mode,
        } => {
            info!("Attaching {} image(s) to sighting ({})", images.len(), mode);
            let sighting = state
                .service
                .attach_images(sighting_id.as_deref(), &images, mode)
                .await
                .map_err(|e| ApiError::from_service("Error updating sighting images", e))?;

            respond(ApiResponse::ok(
                "Sighting images updated successfully",
                sighting,
            ))
        }
    }
}

fn respond<T: serde::Serialize>(response: ApiResponse<T>) -> Result<Json<Value>, ApiError> {
    serde_json::to_value(response)
        .map(Json)
        .map_err(|e| ApiError::Internal {
            message: "Error encoding response".to_string(),
            detail: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use crate::{build_router, AppState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    const BODY_LIMIT: usize = 10 * 1024 * 1024;

    fn app() -> (AppState, Router) {
        let state = AppState::new(Arc::new(MemoryDocumentStore::new()), "wildlife_sightings");
        let router = build_router(state.clone(), BODY_LIMIT);
        (state, router)
    }

    async fn post(router: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let body: Body = body.into();
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/wildlife-sightings")
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn new_record() -> Value {
        json!({
            "purpose": "newRecord",
            "sightingData": {
                "speciesName": "Oriental Pied Hornbill",
                "speciesType": "Bird",
                "coordinates": "1.3521, 103.8198",
                "date": "19/10/2026",
                "time": "07:45"
            },
            "images": [
                {"name": "a.jpg", "type": "image/jpeg", "size": 3, "data": "data:image/jpeg;base64,AAAA"}
            ]
        })
    }

    #[tokio::test]
    async fn test_create_then_retrieve() {
        let (_state, router) = app();

        let (status, body) = post(&router, new_record().to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "Wildlife sighting recorded successfully with 1 image(s)"
        );
        let id = body["data"]["_id"].as_str().unwrap().to_string();
        assert_eq!(body["imageIds"], json!([format!("{}_image_0", id)]));
        assert_eq!(body["data"]["speciesName"], "Oriental Pied Hornbill");

        let (status, body) = post(&router, json!({"purpose": "retrieveAll"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Wildlife sightings retrieved successfully");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["_id"], json!(id));
    }

    #[tokio::test]
    async fn test_retrieve_all_on_empty_store() {
        let (_state, router) = app();
        let (status, body) = post(&router, json!({"purpose": "retrieveAll"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_create_broadcasts_new_sighting() {
        let (state, router) = app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.conn_manager.register("watcher", tx).await;

        let (status, _) = post(&router, new_record().to_string()).await;
        assert_eq!(status, StatusCode::OK);

        match rx.recv().await {
            Some(ServerMessage::NewSighting { data, image_count }) => {
                assert_eq!(data.species_type, "Bird");
                assert_eq!(image_count, 1);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_purpose_and_malformed_body() {
        let (_state, router) = app();

        for body in [
            json!({"purpose": "retrieve"}).to_string(),
            json!({"sightingData": {}}).to_string(),
            "{not json".to_string(),
        ] {
            let (status, response) = post(&router, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["success"], false);
            assert_eq!(response["message"], INVALID_PURPOSE);
            assert!(response["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let state = AppState::new(Arc::new(MemoryDocumentStore::new()), "wildlife_sightings");
        let router = build_router(state.clone(), 1024);

        let mut body = new_record();
        body["images"][0]["data"] = json!(format!("data:image/jpeg;base64,{}", "A".repeat(4096)));

        let (status, response) = post(&router, body.to_string()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response["success"], false);
        assert_ne!(response["message"], INVALID_PURPOSE);
        assert!(state.service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported_media_type() {
        let (_state, router) = app();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/wildlife-sightings")
                    .body(Body::from(json!({"purpose": "retrieveAll"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_ne!(body["message"], INVALID_PURPOSE);
    }

    #[tokio::test]
    async fn test_validation_failure_is_bad_request() {
        let (state, router) = app();
        let body = json!({
            "purpose": "newRecord",
            "sightingData": {"speciesName": "Heron"}
        });

        let (status, response) = post(&router, body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["message"],
            "Species name, species type, and coordinates are required"
        );
        assert!(state.service.list_all().await.unwrap().is_empty());

        let (status, response) =
            post(&router, json!({"purpose": "newRecord"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Sighting data is required");
    }

    #[tokio::test]
    async fn test_attach_images() {
        let (_state, router) = app();
        let (_, created) = post(&router, new_record().to_string()).await;
        let id = created["data"]["_id"].clone();

        let body = json!({
            "purpose": "attachImages",
            "sightingId": id,
            "mode": "append",
            "images": [{"name": "b.png", "type": "image/png", "data": "data:image/png;base64,AAAAAAAA"}]
        });
        let (status, response) = post(&router, body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["message"], "Sighting images updated successfully");
        assert_eq!(response["data"]["images"].as_array().unwrap().len(), 2);
        assert_eq!(response["data"]["images"][1]["size"], 6);
    }

    #[tokio::test]
    async fn test_attach_unknown_sighting_is_not_found() {
        let (state, router) = app();
        let body = json!({
            "purpose": "attachImages",
            "sightingId": "does-not-exist",
            "images": [{"name": "b.png", "type": "image/png", "data": "data:image/png;base64,AAAA"}]
        });

        let (status, response) = post(&router, body.to_string()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["success"], false);
        assert!(state.service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (state, router) = app();
        let (tx, _rx) = mpsc::unbounded_channel();
        state.conn_manager.register("watcher", tx).await;

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "up");
        assert_eq!(body["clients"], 1);
    }
}
