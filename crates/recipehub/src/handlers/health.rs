//! Health check handler.

use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe (GET /health).
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
