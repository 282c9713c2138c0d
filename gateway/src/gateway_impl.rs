//! Main gateway implementation
//!
//! Composes the upstream generator behind the HTTP surface, with the
//! generator injected as a trait so tests can swap in a mock.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;
use crate::traits::TextGenerator;
use crate::web::handlers;

/// HTTP gateway in front of the upstream generation API.
pub struct Gateway<G: TextGenerator> {
    state: Arc<GatewayState>,
    generator: Arc<G>,
}

impl<G: TextGenerator> Clone for Gateway<G> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            generator: self.generator.clone(),
        }
    }
}

impl<G: TextGenerator + 'static> Gateway<G> {
    pub fn new(state: GatewayState, generator: G) -> Self {
        Self {
            state: Arc::new(state),
            generator: Arc::new(generator),
        }
    }

    pub fn state(&self) -> &GatewayState {
        &self.state
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_arc(&self) -> Arc<G> {
        self.generator.clone()
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/claude", post(handlers::generate::<G>))
            .route("/api/claude/bulk", post(handlers::generate_bulk::<G>))
            .route(
                "/api/claude/bulk-stream",
                post(handlers::generate_bulk_stream::<G>),
            )
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()).into_inner())
            .with_state(self.clone())
    }

    /// Bind and serve until the process receives Ctrl+C.
    pub async fn run(&self, bind_address: SocketAddr) -> GatewayResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .map_err(|e| {
                GatewayError::ServerStartup(format!("failed to bind to {bind_address}: {e}"))
            })?;

        shared::logging::log_startup(
            "gateway",
            &format!("generation gateway on http://{bind_address}"),
        );

        tokio::select! {
            result = axum::serve(listener, router) => {
                result.map_err(|e| GatewayError::ServerStartup(e.to_string()))?;
            }
            _ = tokio::signal::ctrl_c() => {
                shared::logging::log_shutdown("gateway", "received Ctrl+C signal");
            }
        }

        Ok(())
    }
}
