#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use voxhook_config::Config;
use voxhook_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    let telemetry_guard = voxhook_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;

    tracing::info!(
        config_path = %args.config.display(),
        webhook = %config.webhook.url,
        otlp_export = telemetry_guard.is_exporting(),
        "starting voxhook"
    );

    let mut server = Server::new(&config)?;
    if let Some(listen) = args.listen {
        server = server.with_listen_address(listen);
    }

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    server.serve(shutdown).await?;

    tracing::info!("voxhook stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
