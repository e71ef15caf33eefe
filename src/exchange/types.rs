//! Exchange request and response types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw reply to a leverage change, passed through uninterpreted
pub type ExchangeAck = serde_json::Value;

/// Raw reply to an order placement, passed through uninterpreted
pub type ExchangeOrderResponse = serde_json::Value;

/// Product category sent with every order
pub const ORDER_CATEGORY: &str = "futures";
pub const ORDER_TYPE_MARKET: &str = "Market";
pub const TIME_IN_FORCE_GTC: &str = "GoodTillCancel";

/// Alert action as sent by TradingView
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Long,
    Short,
    Exit,
}

impl Action {
    /// Parse the alert's `action` field. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "long" => Some(Action::Long),
            "short" => Some(Action::Short),
            "exit" => Some(Action::Exit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Long => "long",
            Action::Short => "short",
            Action::Exit => "exit",
        }
    }

    /// `long` buys; `short` and `exit` both sell.
    pub fn side(&self) -> Side {
        match self {
            Action::Long => Side::Buy,
            Action::Short | Action::Exit => Side::Sell,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order side as Bybit spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leverage change for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct LeverageRequest {
    pub symbol: String,
    pub leverage: String,
}

impl LeverageRequest {
    pub fn to_params(&self, api_key: &str, timestamp: i64) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), api_key.to_string());
        params.insert("symbol".to_string(), self.symbol.clone());
        params.insert("leverage".to_string(), self.leverage.clone());
        params.insert("timestamp".to_string(), timestamp.to_string());
        params
    }
}

/// Market order on the futures book
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrderRequest {
    pub symbol: String,
    pub side: Side,
    pub qty: f64,
    pub reduce_only: bool,
}

impl MarketOrderRequest {
    pub fn to_params(&self, api_key: &str, timestamp: i64) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), api_key.to_string());
        params.insert("symbol".to_string(), self.symbol.clone());
        params.insert("side".to_string(), self.side.to_string());
        params.insert("category".to_string(), ORDER_CATEGORY.to_string());
        params.insert("order_type".to_string(), ORDER_TYPE_MARKET.to_string());
        params.insert("qty".to_string(), self.qty.to_string());
        params.insert("time_in_force".to_string(), TIME_IN_FORCE_GTC.to_string());
        params.insert("reduce_only".to_string(), self.reduce_only.to_string());
        params.insert("close_on_trigger".to_string(), false.to_string());
        params.insert("timestamp".to_string(), timestamp.to_string());
        params
    }
}
