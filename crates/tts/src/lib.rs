#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod http_client;
mod normalize;
mod request;
mod server;
mod types;
mod webhook;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

pub use error::{NormalizationError, Result};
pub use normalize::{RawWebhookResponse, extension_for, normalize};
pub use request::BODY_LIMIT_BYTES;
pub use server::{Server, TtsServerBuilder};
pub use types::{AudioPayload, AudioResult, EchoForm, EchoReply, SpeechForm, SpeechReply, TtsRequest, decoded_len};
pub use webhook::{HttpWebhook, SpeechWebhook};
use request::ExtractPayload;

/// Build the speech server from configuration
pub fn build_server(config: &voxhook_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = TtsServerBuilder::new(config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize speech server: {e}"))?;

    Ok(Arc::new(server))
}

/// Create the endpoint router for the speech proxy and the text echo
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/api/tts", post(synthesize))
        .route("/api", post(echo))
}

/// Handle speech synthesis requests
async fn synthesize(
    State(server): State<Arc<Server>>,
    ExtractPayload(form): ExtractPayload<SpeechForm>,
) -> Result<Json<SpeechReply>> {
    let request = server.validate(form)?;

    tracing::debug!(voice = %request.voice_id, "speech handler called");

    let file = server.synthesize(&request).await?;

    tracing::info!(
        voice = %request.voice_id,
        mime_type = %file.mime_type,
        file_size = file.file_size,
        "speech synthesis complete"
    );

    Ok(Json(SpeechReply {
        success: true,
        file,
        text: request.text,
        voice_id: request.voice_id,
    }))
}

/// Acknowledge submitted text without synthesizing it
async fn echo(ExtractPayload(form): ExtractPayload<EchoForm>) -> Result<Json<EchoReply>> {
    EchoReply::from_form(form).map(Json)
}
