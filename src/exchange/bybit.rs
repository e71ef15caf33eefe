//! Bybit v2 private REST adapter
//!
//! Every call builds a fresh parameter set with its own millisecond timestamp,
//! signs it (see [`crate::exchange::signing`]) and POSTs it form-encoded. Replies
//! are parsed as JSON and handed back without looking at `ret_code`.

use crate::config::{ExchangeConfig, ExchangeCredentials};
use crate::error::Result;
use crate::exchange::signing::SignedRequest;
use crate::exchange::types::*;
use crate::exchange::ExchangeClient;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

pub const LEVERAGE_PATH: &str = "/v2/private/position/leverage";
pub const ORDER_CREATE_PATH: &str = "/v2/private/order/create";

/// Bybit futures client
pub struct BybitClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    exit_reduce_only: bool,
}

impl BybitClient {
    pub fn new(credentials: &ExchangeCredentials, config: &ExchangeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tradeview-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
            exit_reduce_only: config.exit_reduce_only,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current time in epoch milliseconds
    fn timestamp() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Signed leverage request for `timestamp`
    pub fn leverage_request(&self, symbol: &str, leverage: &str, timestamp: i64) -> SignedRequest {
        let request = LeverageRequest {
            symbol: symbol.to_string(),
            leverage: leverage.to_string(),
        };
        SignedRequest::new(&self.api_secret, request.to_params(&self.api_key, timestamp))
    }

    /// Signed market order request for `timestamp`
    pub fn order_request(
        &self,
        symbol: &str,
        action: Action,
        quantity: f64,
        timestamp: i64,
    ) -> SignedRequest {
        let request = MarketOrderRequest {
            symbol: symbol.to_string(),
            side: action.side(),
            qty: quantity,
            reduce_only: action == Action::Exit && self.exit_reduce_only,
        };
        SignedRequest::new(&self.api_secret, request.to_params(&self.api_key, timestamp))
    }

    async fn post_signed(&self, path: &str, request: SignedRequest) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .form(&request.into_form())
            .send()
            .await?;

        debug!("POST {} -> HTTP {}", path, response.status());

        let body: serde_json::Value = response.json().await?;
        Ok(body)
    }
}

#[async_trait]
impl ExchangeClient for BybitClient {
    fn id(&self) -> &'static str {
        "bybit"
    }

    async fn set_leverage(&self, symbol: &str, leverage: &str) -> Result<ExchangeAck> {
        let request = self.leverage_request(symbol, leverage, Self::timestamp());
        let ack = self.post_signed(LEVERAGE_PATH, request).await?;

        info!("Leverage set for {} to {}x: {}", symbol, leverage, ack);
        Ok(ack)
    }

    async fn place_order(
        &self,
        symbol: &str,
        action: Action,
        quantity: f64,
    ) -> Result<ExchangeOrderResponse> {
        if action == Action::Exit && !self.exit_reduce_only {
            warn!(
                "Exit alert for {} is sent as a plain Sell; this opens or extends a short \
                 instead of closing a long (set BYBIT_EXIT_REDUCE_ONLY=true to send reduce-only)",
                symbol
            );
        }

        let request = self.order_request(symbol, action, quantity, Self::timestamp());
        let response = self.post_signed(ORDER_CREATE_PATH, request).await?;

        debug!("Order response for {} {} {}: {}", action, quantity, symbol, response);
        Ok(response)
    }
}
