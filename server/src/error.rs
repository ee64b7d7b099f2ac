use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

/// Failures of the key-value layer underneath the record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(#[from] sqlx::Error),

    /// The stored blob exists but is not a valid record collection.
    #[error("stored collection is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("short code '{0}' not found")]
    NotFound(String),

    #[error("could not generate an unused short code")]
    CodeSpaceExhausted,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::CodeSpaceExhausted | StoreError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to API clients. Internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            StoreError::InvalidUrl { .. } => "Invalid URL format",
            StoreError::NotFound(_) => "Short URL not found",
            StoreError::CodeSpaceExhausted => "Failed to shorten URL",
            StoreError::Storage(_) => "Storage error",
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ApiResponse::<()>::failure(self.public_message()));
        (status, body).into_response()
    }
}
