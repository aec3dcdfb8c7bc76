//! Mapping from store errors to HTTP responses.
//!
//! # Invariants
//! - Every error body is `{"message": "..."}`.
//! - Storage failures never leak internals; the detail is logged instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use itemstore_core::StoreError;
use log::{error, warn};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// HTTP-facing error: a status code plus a human-readable message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a store error raised by `operation`.
    ///
    /// `failure_message` is the public text for storage failures, for
    /// example `"Failed to create item"`.
    pub fn from_store(err: StoreError, operation: &str, failure_message: &str) -> Self {
        match err {
            StoreError::Validation(_) => {
                warn!("event={operation} module=http status=rejected reason={err}");
                Self::bad_request(err.to_string())
            }
            StoreError::NotFound { .. } => {
                warn!("event={operation} module=http status=not_found reason={err}");
                Self::not_found(err.to_string())
            }
            StoreError::Conflict { .. } => {
                warn!("event={operation} module=http status=conflict reason={err}");
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            StoreError::Storage(_) => {
                error!("event={operation} module=http status=error error={err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}
