use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name reported on exported spans
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Extra resource attributes attached to exported spans
    #[serde(default)]
    pub resource_attributes: IndexMap<String, String>,
    /// OTLP exporter; logs stay local when absent
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
    /// Tracing configuration
    #[serde(default)]
    pub tracing: Option<TracingConfig>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            resource_attributes: IndexMap::new(),
            exporter: None,
            tracing: None,
        }
    }
}

/// OTLP exporter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// OTLP endpoint URL
    pub endpoint: Url,
    /// Export protocol
    #[serde(default)]
    pub protocol: ExportProtocol,
}

/// OTLP export protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    /// gRPC (default)
    #[default]
    Grpc,
    /// HTTP/protobuf
    HttpProto,
}

/// Tracing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracingConfig {
    /// Sampling rate (0.0 to 1.0)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
    /// Use parent-based sampler
    #[serde(default = "default_true")]
    pub parent_based: bool,
}

fn default_service_name() -> String {
    "voxhook".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_has_no_exporter() {
        let config: TelemetryConfig = toml::from_str("").unwrap();
        assert_eq!(config.service_name, "voxhook");
        assert!(config.exporter.is_none());
        assert!(config.tracing.is_none());
    }

    #[test]
    fn http_exporter_with_sampling() {
        let toml = r#"
            service_name = "voxhook-staging"

            [resource_attributes]
            "deployment.environment" = "staging"

            [exporter]
            endpoint = "http://collector:4318"
            protocol = "http_proto"

            [tracing]
            sampling_rate = 0.25
        "#;

        let config: TelemetryConfig = toml::from_str(toml).unwrap();
        let exporter = config.exporter.unwrap();
        assert_eq!(exporter.protocol, ExportProtocol::HttpProto);
        assert_eq!(exporter.endpoint.as_str(), "http://collector:4318/");

        let tracing = config.tracing.unwrap();
        assert!((tracing.sampling_rate - 0.25).abs() < f64::EPSILON);
        assert!(tracing.parent_based);
        assert_eq!(config.resource_attributes["deployment.environment"], "staging");
    }
}
