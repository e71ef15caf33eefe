//! Exchange client module
//!
//! The webhook handler talks to the exchange only through [`ExchangeClient`],
//! so the Bybit REST adapter can be swapped for a recording double in tests.

pub mod bybit;
pub mod signing;
pub mod types;

use crate::error::Result;
use async_trait::async_trait;
use types::*;

pub use bybit::BybitClient;
pub use signing::{sign_params, SignedRequest};

/// Private order-entry surface of a derivatives exchange
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Exchange ID (e.g., "bybit")
    fn id(&self) -> &'static str;

    /// Set leverage for a symbol. The exchange reply is returned as-is.
    async fn set_leverage(&self, symbol: &str, leverage: &str) -> Result<ExchangeAck>;

    /// Place a market order for the alert action. The exchange reply is returned as-is.
    async fn place_order(
        &self,
        symbol: &str,
        action: Action,
        quantity: f64,
    ) -> Result<ExchangeOrderResponse>;
}
