#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod webhook;

use serde::Deserialize;

pub use cors::*;
pub use env::ExpandError;
pub use health::*;
pub use server::*;
pub use telemetry::{ExportProtocol, ExporterConfig, TelemetryConfig, TracingConfig};
pub use webhook::*;

/// Top-level voxhook configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote text-to-speech webhook
    pub webhook: WebhookConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
