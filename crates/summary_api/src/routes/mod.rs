pub mod health;
pub mod history;
pub mod keys;
pub mod summarize;
pub mod users;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;

/// Root endpoint with API information.
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "summary-api",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Authenticated summarization API for YouTube content",
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
