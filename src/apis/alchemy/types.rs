//! Alchemy JSON-RPC wire shapes and normalized balance records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: &'static str,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(method: &'static str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// alchemy_getTokenBalances result
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesResult {
    #[serde(default)]
    pub token_balances: Vec<RawTokenBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenBalance {
    pub contract_address: String,
    #[serde(default)]
    pub token_balance: Option<String>,
}

/// alchemy_getTokenMetadata result
#[derive(Debug, Deserialize)]
pub struct TokenMetadataResult {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// One ERC-20 holding, metadata resolved and zero balances dropped
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TokenBalance {
    pub contract: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    pub balance: String,
}

/// Native + token balances for one address
#[derive(Debug, Clone, Serialize)]
pub struct BalancesResult {
    /// Raw hex wei balance, 18 implicit decimals
    pub native_balance: String,
    pub tokens: Vec<TokenBalance>,
}

/// Balance provider failures, all surfaced to callers as 502-class errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AlchemyError {
    /// Credential absent; raised before any network call
    #[error("Missing ALCHEMY_API_KEY")]
    NotConfigured,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl AlchemyError {
    /// Status classification carried in 502 payloads
    pub fn status_label(&self) -> &'static str {
        match self {
            AlchemyError::NotConfigured => "not_configured",
            AlchemyError::Network(_) => "network_error",
            AlchemyError::InvalidResponse(_) => "invalid_response",
            AlchemyError::Rpc { .. } => "rpc_error",
        }
    }
}
