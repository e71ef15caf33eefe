//! Webhook endpoint handlers
//!
//! Provides handlers for:
//! - TradingView alerts (POST /webhooks/tradeview)
//! - Health check (GET /health, GET /)

use crate::auth::SecretVerifier;
use crate::error::{AppError, Result};
use crate::exchange::types::Action;
use crate::exchange::ExchangeClient;
use crate::webhook::types::*;
use axum::{
    body::Bytes,
    extract::{Json, State as AxumState},
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Shared state for webhook handlers
pub struct WebhookState {
    verifier: SecretVerifier,
    exchange: Arc<dyn ExchangeClient>,
}

impl WebhookState {
    pub fn new(webhook_secret: &str, exchange: Arc<dyn ExchangeClient>) -> Self {
        Self {
            verifier: SecretVerifier::new(webhook_secret),
            exchange,
        }
    }

    pub fn exchange(&self) -> &Arc<dyn ExchangeClient> {
        &self.exchange
    }
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint - GET /health or GET /
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::running())
}

// ============================================================================
// TradingView Webhook
// ============================================================================

/// TradingView webhook endpoint - POST /webhooks/tradeview
///
/// The body is parsed regardless of Content-Type: TradingView posts alert text
/// as `text/plain` unless it recognises the message as JSON.
pub async fn tradeview_webhook(
    AxumState(state): AxumState<Arc<WebhookState>>,
    body: Bytes,
) -> Result<Json<OrderResult>> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Alert body is not valid JSON: {}", e)))?;
    handle_alert(&state, payload).await.map(Json)
}

/// Validate an alert and forward it to the exchange.
///
/// Checks run in order: shared secret, action, remaining fields. Nothing is
/// sent to the exchange unless all of them pass. Leverage is always set before
/// the order goes out; if either call fails the whole alert fails.
pub async fn handle_alert(state: &WebhookState, payload: Value) -> Result<OrderResult> {
    info!("Received alert: {}", redact_payload(&payload));

    let fields = payload
        .as_object()
        .ok_or_else(|| AppError::Validation("Alert payload must be a JSON object".to_string()))?;

    let provided = fields.get("secret").and_then(Value::as_str).unwrap_or_default();
    if !state.verifier.verify(provided) {
        return Err(AppError::Unauthorized);
    }

    let action = match fields.get("action") {
        Some(Value::String(raw)) => {
            Action::parse(raw).ok_or_else(|| AppError::InvalidAction(raw.clone()))?
        }
        Some(other) => return Err(AppError::InvalidAction(other.to_string())),
        None => return Err(AppError::InvalidAction("missing".to_string())),
    };

    let alert: AlertPayload = serde_json::from_value(payload)
        .map_err(|e| AppError::Validation(format!("Invalid alert payload: {}", e)))?;

    let quantity = alert.get_quantity();
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AppError::Validation(format!(
            "quantity must be a positive number, got {}",
            quantity
        )));
    }

    let symbol = alert.get_symbol();
    let leverage = alert.get_leverage();

    info!(
        "Forwarding {} {} {} at {}x to {}",
        action,
        quantity,
        symbol,
        leverage,
        state.exchange.id()
    );

    state.exchange.set_leverage(symbol, leverage).await?;
    let order_response = state.exchange.place_order(symbol, action, quantity).await?;

    Ok(OrderResult::success(order_response))
}
