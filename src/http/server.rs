//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the echo handler
//! - Wire up middleware (tracing, timeout, secure scheme guard)
//! - Bind server to listener
//! - Shut down gracefully on Ctrl+C

use axum::{
    http::{Method, Uri},
    middleware,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::descriptor::SchemeResolution;
use crate::http::middleware::{require_https_middleware, RequireHttpsState};
use crate::security::SecureSchemeGuard;

/// HTTP server with the secure scheme guard in front of every route.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let guard = SecureSchemeGuard::new(config.guard.clone());
        let scheme = SchemeResolution {
            trust_forwarded_proto: config.listener.trust_forwarded_proto,
            ..SchemeResolution::default()
        };

        let router = Self::build_router(&config, RequireHttpsState::new(guard, scheme));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: RequireHttpsState) -> Router {
        Router::new()
            .fallback(echo_handler)
            .layer(middleware::from_fn_with_state(state, require_https_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or driving directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            https_port = self.config.guard.https_port_number,
            force_401 = self.config.guard.force_401,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Reached only by requests the guard let through.
async fn echo_handler(method: Method, uri: Uri) -> String {
    format!("{method} {uri}")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
