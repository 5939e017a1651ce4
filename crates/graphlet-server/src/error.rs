//! API error type and its JSON representation

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use graphlet_storage::StorageError;
use thiserror::Error;

/// Errors returned to HTTP clients as `{"error": message}`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store failure to a client error.
    ///
    /// Internal failures are logged with their detail and reported with the
    /// generic `fault` message only.
    pub fn from_storage(err: StorageError, fault: &str) -> Self {
        match err {
            StorageError::Invalid(e) => e.into(),
            StorageError::InvalidNodes => Self::BadRequest(err.to_string()),
            StorageError::NodeNotFound(_) => Self::NotFound("Node not found".to_string()),
            StorageError::RelationshipNotFound(_) => {
                Self::NotFound("Relationship not found".to_string())
            }
            StorageError::Lock(detail) => {
                tracing::error!("{}: {}", fault, detail);
                Self::Internal(fault.to_string())
            }
        }
    }
}

impl From<graphlet_core::Error> for ApiError {
    fn from(err: graphlet_core::Error) -> Self {
        match err {
            graphlet_core::Error::Validation(message) => Self::BadRequest(message),
            graphlet_core::Error::InvalidId(_) => Self::BadRequest("Invalid ID format".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Bodies without a Content-Length only hit the size limit while buffering
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
