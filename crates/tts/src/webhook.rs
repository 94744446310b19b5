use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use voxhook_config::WebhookConfig;

use crate::{
    error::{NormalizationError, Result},
    http_client::http_client,
    normalize::RawWebhookResponse,
    types::TtsRequest,
};

/// Remote text-to-speech service
#[async_trait]
pub trait SpeechWebhook: Send + Sync {
    /// Send one synthesis request and buffer the whole response
    async fn call(&self, request: &TtsRequest) -> Result<RawWebhookResponse>;
}

/// Body sent to the webhook
#[derive(Debug, serde::Serialize)]
struct WebhookRequest<'a> {
    text: &'a str,
    voice: &'a str,
    model_id: &'a str,
}

/// Webhook reached over HTTP
pub struct HttpWebhook {
    client: Client,
    url: Url,
    model_id: String,
    api_key: Option<SecretString>,
    headers: HeaderMap,
}

impl HttpWebhook {
    /// Build the client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout or a configured header is invalid,
    /// or the HTTP client cannot be built
    pub fn from_config(config: &WebhookConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::with_capacity(config.headers.len());
        for (name, value) in &config.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| anyhow::anyhow!("invalid webhook header name '{name}': {e}"))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| anyhow::anyhow!("invalid value for webhook header '{}': {e}", name.as_str()))?;
            headers.insert(name, value);
        }

        let client = http_client(config.timeout_duration()?)
            .map_err(|e| anyhow::anyhow!("failed to build webhook HTTP client: {e}"))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model_id: config.model_id.clone(),
            api_key: config.api_key.clone(),
            headers,
        })
    }
}

#[async_trait]
impl SpeechWebhook for HttpWebhook {
    async fn call(&self, request: &TtsRequest) -> Result<RawWebhookResponse> {
        tracing::debug!(
            voice = %request.voice_id,
            model = %self.model_id,
            input_len = request.text.len(),
            "calling speech webhook"
        );

        let body = WebhookRequest {
            text: &request.text,
            voice: &request.voice_id,
            model_id: &self.model_id,
        };

        let mut builder = self.client.post(self.url.clone()).headers(self.headers.clone()).json(&body);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NormalizationError::UpstreamUnreachable(format!("failed to send request: {e}")))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| NormalizationError::UpstreamUnreachable(format!("failed to read response body: {e}")))?;

        tracing::debug!(%status, bytes = body.len(), "speech webhook responded");

        Ok(RawWebhookResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
