//! Webhook request and response types
//!
//! TradingView alert templates are free text, so numeric fields arrive either as
//! JSON numbers or as strings depending on how the user wrote the template.
//! The custom deserializers below accept both.

use crate::exchange::types::ExchangeOrderResponse;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_SYMBOL: &str = "ETHUSDT";
pub const DEFAULT_QUANTITY: f64 = 0.01;
pub const DEFAULT_LEVERAGE: &str = "3";

// ============================================================================
// Custom Deserializers for alert template compatibility
// ============================================================================

/// Deserialize a number or a numeric string into `f64`. `null` yields the default.
fn deserialize_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleFloat {
        Float(f64),
        Int(i64),
        Str(String),
    }

    match Option::<FlexibleFloat>::deserialize(deserializer)? {
        None => Ok(default_quantity()),
        Some(FlexibleFloat::Float(f)) => Ok(f),
        Some(FlexibleFloat::Int(i)) => Ok(i as f64),
        Some(FlexibleFloat::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Deserialize a string or a number into its string form
fn deserialize_flexible_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleString {
        Str(String),
        Int(i64),
        Float(f64),
    }

    match Option::<FlexibleString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlexibleString::Str(s)) => Ok(Some(s)),
        Some(FlexibleString::Int(i)) => Ok(Some(i.to_string())),
        Some(FlexibleString::Float(f)) => Ok(Some(f.to_string())),
    }
}

fn default_quantity() -> f64 {
    DEFAULT_QUANTITY
}

// ============================================================================
// Alert payload
// ============================================================================

/// TradingView alert body
///
/// Order parameters of an alert. `secret` and `action` are checked by the
/// handler on the raw body before this is built; other unknown fields are
/// ignored. Use [`redact_payload`] before printing the raw body.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertPayload {
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub symbol: Option<String>,
    #[serde(default = "default_quantity", deserialize_with = "deserialize_flexible_f64")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "deserialize_flexible_string")]
    pub leverage: Option<String>,
}

impl AlertPayload {
    pub fn get_symbol(&self) -> &str {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SYMBOL)
    }

    pub fn get_leverage(&self) -> &str {
        self.leverage
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LEVERAGE)
    }

    pub fn get_quantity(&self) -> f64 {
        self.quantity
    }
}

/// Copy of the raw payload with `secret` masked, for logging
pub fn redact_payload(payload: &serde_json::Value) -> serde_json::Value {
    let mut redacted = payload.clone();
    if let Some(obj) = redacted.as_object_mut() {
        if obj.contains_key("secret") {
            obj.insert("secret".to_string(), serde_json::Value::String("***".to_string()));
        }
    }
    redacted
}

// ============================================================================
// Responses
// ============================================================================

/// Successful webhook reply: the raw order-create response from the exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub status: String,
    pub order_response: ExchangeOrderResponse,
}

impl OrderResult {
    pub fn success(order_response: ExchangeOrderResponse) -> Self {
        Self {
            status: "success".to_string(),
            order_response,
        }
    }
}

/// Health check reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "success".to_string(),
            message: "tradeview-bridge is running".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let payload: AlertPayload =
            serde_json::from_value(json!({"secret": "S", "action": "long"})).unwrap();

        assert_eq!(payload.get_symbol(), "ETHUSDT");
        assert_eq!(payload.get_quantity(), 0.01);
        assert_eq!(payload.get_leverage(), "3");
    }

    #[test]
    fn test_explicit_values() {
        let payload: AlertPayload = serde_json::from_value(json!({
            "secret": "S",
            "action": "short",
            "symbol": "BTCUSDT",
            "quantity": 0.02,
            "leverage": "5"
        }))
        .unwrap();

        assert_eq!(payload.get_symbol(), "BTCUSDT");
        assert_eq!(payload.get_quantity(), 0.02);
        assert_eq!(payload.get_leverage(), "5");
    }

    #[test]
    fn test_flexible_numbers() {
        let payload: AlertPayload = serde_json::from_value(json!({
            "action": "exit",
            "quantity": "0.5",
            "leverage": 10
        }))
        .unwrap();

        assert_eq!(payload.get_quantity(), 0.5);
        assert_eq!(payload.get_leverage(), "10");

        let payload: AlertPayload =
            serde_json::from_value(json!({"action": "long", "quantity": 2})).unwrap();
        assert_eq!(payload.get_quantity(), 2.0);
    }

    #[test]
    fn test_nulls_fall_back_to_defaults() {
        let payload: AlertPayload = serde_json::from_value(json!({
            "action": "long",
            "symbol": null,
            "quantity": null,
            "leverage": null
        }))
        .unwrap();

        assert_eq!(payload.get_symbol(), "ETHUSDT");
        assert_eq!(payload.get_quantity(), 0.01);
        assert_eq!(payload.get_leverage(), "3");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let payload: AlertPayload = serde_json::from_value(json!({
            "action": "long",
            "strategy": "ema-cross",
            "price": 3120.5
        }))
        .unwrap();
        assert_eq!(payload.get_symbol(), "ETHUSDT");
    }

    #[test]
    fn test_bad_quantity_rejected() {
        let result: Result<AlertPayload, _> =
            serde_json::from_value(json!({"action": "long", "quantity": "lots"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_redact_payload() {
        let raw = json!({"secret": "S", "action": "long"});
        let redacted = redact_payload(&raw);
        assert_eq!(redacted["secret"], "***");
        assert_eq!(redacted["action"], "long");
        assert_eq!(raw["secret"], "S");

        let no_secret = json!({"action": "long"});
        assert_eq!(redact_payload(&no_secret), no_secret);
    }

    #[test]
    fn test_order_result_shape() {
        let result = OrderResult::success(json!({"ret_code": 0}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"status": "success", "order_response": {"ret_code": 0}}));
    }
}
