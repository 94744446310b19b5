use std::time::Duration;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Model identifier sent with every synthesis request unless overridden
pub const DEFAULT_MODEL_ID: &str = "eleven_v3";

/// Remote text-to-speech webhook configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Endpoint that receives `{ text, voice, model_id }`
    pub url: Url,
    /// Value of the `model_id` field on the wire
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Voice used when the caller submits an empty `voiceId`
    #[serde(default)]
    pub default_voice_id: Option<String>,
    /// Sent as `Authorization: Bearer <key>` when present
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Request timeout, e.g. "120s" or "2m"
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Extra static headers attached to every webhook call
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl WebhookConfig {
    /// Minimal configuration pointing at `url` with every other field defaulted
    pub fn new(url: Url) -> Self {
        Self {
            url,
            model_id: default_model_id(),
            default_voice_id: None,
            api_key: None,
            timeout: default_timeout(),
            headers: IndexMap::new(),
        }
    }

    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string is malformed
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid webhook timeout '{}': {e}", self.timeout))
    }
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_timeout() -> String {
    "120s".to_string()
}
