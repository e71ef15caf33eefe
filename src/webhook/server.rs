//! HTTP server for the TradingView webhook

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::webhook::handlers::{self, WebhookState};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const WEBHOOK_PATH: &str = "/webhooks/tradeview";

/// Build the router with all routes
pub fn build_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::health_check))
        .route(WEBHOOK_PATH, post(handlers::tradeview_webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Webhook server manager
pub struct WebhookServer {
    state: Arc<WebhookState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl WebhookServer {
    /// Create a new server
    pub fn new(state: Arc<WebhookState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
            handle: None,
            local_addr: None,
        }
    }

    /// Bind the listener and start serving in the background
    pub async fn start(&mut self, config: &ServerConfig) -> Result<SocketAddr> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid listen address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let app = build_router(self.state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        info!("Starting webhook server on {}", local_addr);

        self.handle = Some(tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Webhook server shutting down");
            });

            if let Err(e) = server.await {
                error!("Webhook server error: {}", e);
            }
        }));

        self.local_addr = Some(local_addr);

        info!("=== Endpoints ===");
        info!("  GET  http://{}/health", local_addr);
        info!("  POST http://{}{}", local_addr, WEBHOOK_PATH);

        Ok(local_addr)
    }

    /// Address the listener is bound to, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Webhook server stop signal sent");
        }
    }

    /// Stop the server and wait for in-flight requests to finish
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Webhook server task failed: {}", e);
            }
        }
    }

    /// Check if server is running: started, not stopped, and the serve task
    /// has not exited on its own
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for WebhookServer {
    fn drop(&mut self) {
        self.stop();
    }
}
