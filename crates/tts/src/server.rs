use crate::{
    error::Result,
    normalize::normalize,
    types::{AudioResult, SpeechForm, TtsRequest},
    webhook::{HttpWebhook, SpeechWebhook},
};

/// Speech proxy: validates requests, calls the webhook, normalizes replies
pub struct Server {
    webhook: Box<dyn SpeechWebhook>,
    default_voice_id: Option<String>,
}

impl Server {
    pub fn new(webhook: impl SpeechWebhook + 'static, default_voice_id: Option<String>) -> Self {
        Self {
            webhook: Box::new(webhook),
            default_voice_id,
        }
    }

    /// Validate a submitted form, substituting the default voice if needed
    pub fn validate(&self, form: SpeechForm) -> Result<TtsRequest> {
        TtsRequest::from_form(form, self.default_voice_id.as_deref())
    }

    /// Synthesize `request` through the webhook
    ///
    /// One upstream call, no retries.
    pub async fn synthesize(&self, request: &TtsRequest) -> Result<AudioResult> {
        let raw = self.webhook.call(request).await?;
        normalize(&raw)
    }
}

/// Builder for constructing the speech server from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a voxhook_config::Config,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a voxhook_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let webhook_config = &self.config.webhook;
        let webhook = HttpWebhook::from_config(webhook_config)?;

        tracing::debug!(
            url = %webhook_config.url,
            model = %webhook_config.model_id,
            "speech webhook configured"
        );

        Ok(Server::new(webhook, webhook_config.default_voice_id.clone()))
    }
}
