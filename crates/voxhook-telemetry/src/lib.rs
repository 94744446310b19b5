//! Logging and trace export for voxhook
//!
//! Logs always go to stdout through `tracing-subscriber`. When an OTLP
//! exporter is configured, spans are additionally exported through
//! `tracing-opentelemetry`.

mod metadata;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use voxhook_config::{ExportProtocol, ExporterConfig, TelemetryConfig, TracingConfig};

/// Guard that shuts down the trace pipeline on drop
///
/// Must be held for the lifetime of the application so buffered spans
/// are flushed on exit.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported over OTLP
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and, when configured, OTLP trace export
///
/// `log_filter` uses `EnvFilter` syntax; an unparsable filter falls back
/// to `info`.
///
/// # Errors
///
/// Returns an error if the OTLP span exporter cannot be built
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let Some((telemetry_config, exporter)) = config.and_then(|c| c.exporter.as_ref().map(|e| (c, e))) else {
        tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        return Ok(TelemetryGuard { tracer_provider: None });
    };

    let tracer_provider = init_tracer(telemetry_config, exporter)?;
    let tracer = tracer_provider.tracer("voxhook");
    global::set_tracer_provider(tracer_provider.clone());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .init();

    tracing::debug!(endpoint = %exporter.endpoint, "OTLP trace export enabled");

    Ok(TelemetryGuard {
        tracer_provider: Some(tracer_provider),
    })
}

fn init_tracer(config: &TelemetryConfig, exporter: &ExporterConfig) -> anyhow::Result<SdkTracerProvider> {
    let exporter = build_span_exporter(exporter)?;

    let provider = SdkTracerProvider::builder()
        .with_resource(metadata::build_resource(config))
        .with_sampler(sampler(config.tracing.as_ref()))
        .with_batch_exporter(exporter)
        .build();

    Ok(provider)
}

/// Map the configured sampling rate onto an OpenTelemetry sampler
fn sampler(config: Option<&TracingConfig>) -> Sampler {
    let rate = config.map_or(1.0, |t| t.sampling_rate);

    let sampler = if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    };

    if config.is_none_or(|t| t.parent_based) {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    }
}

fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::{SpanExporter, WithExportConfig};

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}
