mod cors;
mod health;

use std::net::SocketAddr;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use voxhook_config::Config;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook client cannot be initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let tts_state = tts::build_server(config)?;

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Speech proxy and text echo
        app = app.merge(tts::endpoint_router().with_state(tts_state));

        // Browser form
        if let Some(ref dir) = config.server.static_dir {
            tracing::debug!(dir = %dir.display(), "serving static assets");
            app = app.fallback_service(ServeDir::new(dir));
        }

        // Apply middleware layers (innermost first)
        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address, e.g. from the command line
    #[must_use]
    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
