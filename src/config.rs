//! Process configuration
//!
//! Everything is read once at startup and handed to the exchange client and the
//! webhook state by value. Nothing in request handling touches the environment.

use crate::error::{AppError, Result};
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api-testnet.bybit.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Exchange API credentials plus the webhook shared secret
#[derive(Clone)]
pub struct ExchangeCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub webhook_secret: String,
}

impl fmt::Debug for ExchangeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("webhook_secret", &"<redacted>")
            .finish()
    }
}

/// Outbound exchange settings
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub base_url: String,
    /// Send `exit` alerts as reduce-only sells instead of plain sells
    pub exit_reduce_only: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            exit_reduce_only: false,
        }
    }
}

/// Inbound listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: ExchangeCredentials,
    pub exchange: ExchangeConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(AppError::Config(format!("{} must be set", key))),
            }
        };

        let credentials = ExchangeCredentials {
            webhook_secret: required("WEBHOOK_SECRET")?,
            api_key: required("BYBIT_API_KEY")?,
            api_secret: required("BYBIT_API_SECRET")?,
        };

        let base_url = lookup("BYBIT_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let exit_reduce_only = match lookup("BYBIT_EXIT_REDUCE_ONLY") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                AppError::Config(format!("BYBIT_EXIT_REDUCE_ONLY is not a boolean: {}", value))
            })?,
            None => false,
        };

        let host = lookup("WEBHOOK_HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("WEBHOOK_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("Invalid WEBHOOK_PORT {}: {}", value, e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            credentials,
            exchange: ExchangeConfig {
                base_url,
                exit_reduce_only,
            },
            server: ServerConfig { host, port },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("WEBHOOK_SECRET", "tv-hook-9f2"),
        ("BYBIT_API_KEY", "bybit-key-71"),
        ("BYBIT_API_SECRET", "bybit-secret-c4"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.credentials.webhook_secret, "tv-hook-9f2");
        assert_eq!(config.credentials.api_key, "bybit-key-71");
        assert_eq!(config.credentials.api_secret, "bybit-secret-c4");
        assert_eq!(config.exchange.base_url, DEFAULT_BASE_URL);
        assert!(!config.exchange.exit_reduce_only);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_missing_secret_fails() {
        for missing in ["WEBHOOK_SECRET", "BYBIT_API_KEY", "BYBIT_API_SECRET"] {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();
            let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, AppError::Config(ref msg) if msg.contains(missing)));
        }
    }

    #[test]
    fn test_empty_secret_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("WEBHOOK_SECRET", "   ");
        assert!(AppConfig::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BYBIT_BASE_URL", "https://api.bybit.com/"));
        pairs.push(("BYBIT_EXIT_REDUCE_ONLY", "true"));
        pairs.push(("WEBHOOK_HOST", "127.0.0.1"));
        pairs.push(("WEBHOOK_PORT", "9001"));

        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.exchange.base_url, "https://api.bybit.com");
        assert!(config.exchange.exit_reduce_only);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9001);
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("WEBHOOK_PORT", "eighty"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&pairs)),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("tv-hook-9f2"));
        assert!(!printed.contains("bybit-key-71"));
        assert!(!printed.contains("bybit-secret-c4"));
        assert!(printed.contains("<redacted>"));
    }
}
