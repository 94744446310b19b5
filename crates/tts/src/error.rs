use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NormalizationError>;

/// Message returned to callers for every server-side failure
const GENERIC_FAILURE: &str = "Failed to generate audio";

/// Failures of the speech proxy, each mapped to one HTTP status
///
/// Server-side variants carry diagnostic detail that is logged but never
/// returned to the caller.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(String),

    /// Request body is not `application/json`
    #[error("Unsupported Content-Type, expected 'application/json'")]
    UnsupportedMediaType,

    /// Request body exceeds the extractor limit
    #[error("Request body is too large, limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Webhook answered with a non-2xx status
    #[error("Webhook request failed: {status} {status_text}")]
    UpstreamRejected { status: u16, status_text: String },

    /// Webhook could not be reached or its body could not be read
    #[error("Webhook unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Webhook body was neither audio nor well-formed JSON of a usable shape
    #[error("Invalid webhook payload: {0}")]
    InvalidUpstreamPayload(String),

    /// Webhook JSON matched none of the known shapes
    #[error("Unrecognized webhook response format: {snippet}")]
    UnrecognizedFormat { snippet: String },
}

impl NormalizationError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::UpstreamUnreachable(_) | Self::InvalidUpstreamPayload(_) | Self::UnrecognizedFormat { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to expose to callers
    pub fn client_message(&self) -> String {
        match self {
            Self::UpstreamUnreachable(_) | Self::InvalidUpstreamPayload(_) | Self::UnrecognizedFormat { .. } => {
                GENERIC_FAILURE.to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for NormalizationError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(%status, "speech request failed: {self}");
        } else {
            tracing::debug!(%status, "speech request rejected: {self}");
        }

        let body = ErrorResponse {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
