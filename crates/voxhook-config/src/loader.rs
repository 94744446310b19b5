use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook or telemetry settings are unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_webhook()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_webhook(&self) -> anyhow::Result<()> {
        let webhook = &self.webhook;

        if !matches!(webhook.url.scheme(), "http" | "https") {
            anyhow::bail!("webhook.url must use http or https, got '{}'", webhook.url.scheme());
        }

        if webhook.model_id.trim().is_empty() {
            anyhow::bail!("webhook.model_id must not be empty");
        }

        if webhook.timeout_duration()?.is_zero() {
            anyhow::bail!("webhook.timeout must be greater than zero");
        }

        if let Some(ref voice) = webhook.default_voice_id
            && voice.trim().is_empty()
        {
            anyhow::bail!("webhook.default_voice_id must not be empty when set");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        if let Some(rate) = self
            .telemetry
            .as_ref()
            .and_then(|t| t.tracing.as_ref())
            .map(|t| t.sampling_rate)
            && !(0.0..=1.0).contains(&rate)
        {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0, got {rate}");
        }

        Ok(())
    }
}
