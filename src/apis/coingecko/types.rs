//! CoinGecko response shapes
//!
//! Only the fields the dashboard serves are modeled; everything else is
//! dropped at the adapter boundary. Numeric market fields are nullable
//! because the upstream emits null for delisted or illiquid markets.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the /coins/markets listing, passed through to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinMarketRow {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Per-id entry of the /simple/price response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SimplePriceEntry {
    #[serde(default)]
    pub usd: Option<f64>,
}

pub type SimplePriceResponse = HashMap<String, SimplePriceEntry>;

/// Error shape shared by every CoinGecko call.
///
/// `status` is `"network_error"`, `"invalid_json"`, or the upstream HTTP
/// status rendered as a string; it travels to 502 responses unchanged.
#[derive(Debug, Clone, thiserror::Error)]
#[error("CoinGecko error ({status}): {message}")]
pub struct CoinGeckoError {
    pub status: String,
    pub message: String,
}

impl CoinGeckoError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: "network_error".to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self {
            status: "invalid_json".to_string(),
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
        }
    }
}
