//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use lineqr_core::{MemberStore, MessagingApi, SignatureVerifier};
use lineqr_understanding::QrReader;

use crate::dispatch::EventDispatcher;
use crate::health_api;
use crate::webhook;

/// Request-handling context. Built once at startup; read-only afterwards
/// apart from the member registry's own locking.
#[derive(Clone)]
pub struct GatewayState {
    pub verifier: Arc<dyn SignatureVerifier>,
    pub dispatcher: Arc<EventDispatcher>,
    pub members: Arc<dyn MemberStore>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(
        verifier: Arc<dyn SignatureVerifier>,
        api: Arc<dyn MessagingApi>,
        qr: QrReader,
        members: Arc<dyn MemberStore>,
    ) -> Self {
        let dispatcher = Arc::new(EventDispatcher::new(api, qr, Arc::clone(&members)));
        Self {
            verifier,
            dispatcher,
            members,
            started_at: Instant::now(),
        }
    }
}

/// Build the router: the webhook at `webhook_path` plus `GET /api/health`.
pub fn build_router(state: GatewayState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(webhook::callback))
        .route("/api/health", get(health_api::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState, webhook_path: &str) -> Result<()> {
    let app = build_router(state, webhook_path);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
}
