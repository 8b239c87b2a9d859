//! HTTP error responses
//!
//! Every failure is rendered in the same `{success:false, message, data:null}`
//! envelope as a successful response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use wildlife_core::{ApiResponse, WildlifeError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The request never reached a handler intact (oversized body, wrong content type)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// `message` is the generic text for the failed operation, `detail` the cause
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    /// Map a service failure, using `message` when the caller is not at fault.
    pub fn from_service(message: &str, error: WildlifeError) -> Self {
        match error {
            WildlifeError::Validation(msg) => ApiError::BadRequest(msg),
            WildlifeError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal {
                message: message.to_string(),
                detail: other.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: ApiResponse<()> = match self {
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Rejected { message, .. } => ApiResponse::failure(message),
            ApiError::Internal { message, detail } => {
                tracing::error!("{}: {}", message, detail);
                ApiResponse::failure(message).with_error(detail)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status() {
        let cases = [
            (WildlifeError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                WildlifeError::NotFound("gone".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                WildlifeError::StoreUnavailable {
                    attempts: 3,
                    reason: "refused".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WildlifeError::Timeout("find".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from_service("Error", error).status(), status);
        }
    }

    #[test]
    fn test_internal_keeps_generic_message() {
        let error = ApiError::from_service(
            "Error retrieving wildlife sightings",
            WildlifeError::Store("disk I/O error".to_string()),
        );
        match error {
            ApiError::Internal { message, detail } => {
                assert_eq!(message, "Error retrieving wildlife sightings");
                assert_eq!(detail, "Database error: disk I/O error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
