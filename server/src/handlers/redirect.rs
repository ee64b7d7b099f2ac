use crate::{error::StoreError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// GET /:code
///
/// Resolve the short code (counting the click) and redirect to the original URL.
pub async fn redirect(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    match state.store.lookup(&code).await {
        Ok(record) => Redirect::to(&record.original_url).into_response(),
        Err(StoreError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Short link not found").into_response()
        }
        Err(e) => {
            tracing::error!("Error resolving short code '{}': {}", code, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
