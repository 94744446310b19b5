use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness check; does not touch the webhook
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
