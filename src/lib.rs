//! tradeview-bridge - TradingView alerts to Bybit futures orders
//!
//! Receives alert webhooks, checks the shared secret, sets leverage for the
//! symbol and places a signed market order on Bybit.

pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod webhook;

use config::AppConfig;
use error::Result;
use exchange::BybitClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhook::{WebhookServer, WebhookState};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradeview_bridge=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the webhook server and run until Ctrl-C
pub async fn run(config: AppConfig) -> Result<()> {
    tracing::info!("Starting tradeview-bridge...");
    tracing::info!("Exchange base URL: {}", config.exchange.base_url);

    let exchange = BybitClient::new(&config.credentials, &config.exchange)?;
    let state = Arc::new(WebhookState::new(
        &config.credentials.webhook_secret,
        Arc::new(exchange),
    ));

    let mut server = WebhookServer::new(state);
    server.start(&config.server).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received");

    server.shutdown().await;
    tracing::info!("tradeview-bridge stopped");
    Ok(())
}
