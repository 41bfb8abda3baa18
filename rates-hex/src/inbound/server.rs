//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use rates_types::MidRateProvider;

use super::handlers::{self, AppState};
use crate::RateService;

/// HTTP Server for the exchange rates API.
pub struct HttpServer<P: MidRateProvider> {
    state: Arc<AppState<P>>,
    metrics: bool,
}

impl<P: MidRateProvider> HttpServer<P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: RateService<P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            metrics: false,
        }
    }

    /// Records HTTP metrics through the global OpenTelemetry meter provider.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics = enabled;
        self
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/exchange-rates", get(handlers::exchange_rates::<P>))
            .route("/api-docs/openapi.json", get(handlers::openapi))
            .with_state(self.state.clone());

        if self.metrics {
            router = router.layer(axum_otel_metrics::HttpMetricsLayerBuilder::new().build());
        }

        // Browser front-ends are served from another origin
        router
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
