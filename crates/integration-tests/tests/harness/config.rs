//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use voxhook_config::{Config, CorsConfig, ServerConfig, WebhookConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder whose webhook points at `webhook_url`
    pub fn new(webhook_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                webhook: WebhookConfig::new(webhook_url.parse().expect("valid URL")),
                telemetry: None,
            },
        }
    }

    /// Voice used for empty `voiceId` submissions
    pub fn with_default_voice(mut self, voice: &str) -> Self {
        self.config.webhook.default_voice_id = Some(voice.to_owned());
        self
    }

    /// Bearer token sent to the webhook
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.config.webhook.api_key = Some(key.to_owned().into());
        self
    }

    /// Static header sent to the webhook
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.config.webhook.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Webhook request timeout, e.g. "200ms"
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.webhook.timeout = timeout.to_owned();
        self
    }

    /// Serve static assets from `dir`
    pub fn with_static_dir(mut self, dir: &Path) -> Self {
        self.config.server.static_dir = Some(dir.to_path_buf());
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
