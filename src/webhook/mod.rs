//! Webhook server module
//!
//! Provides:
//! - TradingView alert webhook (/webhooks/tradeview)
//! - Health check (/health)
//!
//! Usage:
//! 1. Set WEBHOOK_SECRET, BYBIT_API_KEY and BYBIT_API_SECRET
//! 2. Start the binary; it listens on 0.0.0.0:8000 unless WEBHOOK_HOST/WEBHOOK_PORT say otherwise
//! 3. Point the TradingView alert at `<public_url>/webhooks/tradeview`
//! 4. Use an alert message like `{"secret":"...","action":"long","symbol":"BTCUSDT","quantity":0.01,"leverage":"3"}`

pub mod handlers;
mod server;
mod types;

pub use handlers::{handle_alert, WebhookState};
pub use server::{build_router, WebhookServer, WEBHOOK_PATH};
pub use types::{
    redact_payload, AlertPayload, HealthResponse, OrderResult, DEFAULT_LEVERAGE,
    DEFAULT_QUANTITY, DEFAULT_SYMBOL,
};
