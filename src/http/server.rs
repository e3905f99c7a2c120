//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::{ChainSubmitter, StubSubmitter};
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::lifecycle::shutdown::requested;
use crate::lifecycle::signals::shutdown_signal;
use crate::submission::SubmissionCoordinator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SubmissionCoordinator>,
}

/// HTTP server for the transaction gateway.
pub struct HttpServer {
    router: Router,
    coordinator: Arc<SubmissionCoordinator>,
}

impl HttpServer {
    /// Create a server backed by the stub submitter described in `config`.
    pub fn new(config: GatewayConfig) -> Self {
        let submitter = StubSubmitter::from_config(config.chains.clone(), &config.submitter);
        Self::with_submitter(config, Arc::new(submitter))
    }

    /// Create a server backed by a caller-supplied submitter.
    pub fn with_submitter(config: GatewayConfig, submitter: Arc<dyn ChainSubmitter>) -> Self {
        let coordinator = Arc::new(SubmissionCoordinator::from_config(&config, submitter));
        let state = AppState {
            coordinator: coordinator.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            coordinator,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/send-tx", post(handlers::send_tx))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A copy of the router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The coordinator behind the `/send-tx` route.
    pub fn coordinator(&self) -> &Arc<SubmissionCoordinator> {
        &self.coordinator
    }

    /// Run the server until an OS signal or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = requested(&mut shutdown) => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
