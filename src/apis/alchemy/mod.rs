/// Alchemy balance provider client (JSON-RPC over HTTPS)
///
/// Endpoints used:
/// - eth_getBalance            - native balance (hex wei)
/// - alchemy_getTokenBalances  - ERC-20 balances for an address
/// - alchemy_getTokenMetadata  - symbol/name/decimals per contract
pub mod types;

use crate::apis::client::HttpClient;
use crate::config::AlchemyConfig;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub use self::types::{
    AlchemyError, BalancesResult, RawTokenBalance, RpcRequest, RpcResponse, TokenBalance,
    TokenBalancesResult, TokenMetadataResult,
};

const TIMEOUT_SECS: u64 = 15;

/// Balance surface the portfolio handler depends on
#[async_trait]
pub trait BalanceApi: Send + Sync {
    async fn balances(&self, address: &str) -> Result<BalancesResult, AlchemyError>;
}

pub struct AlchemyClient {
    http_client: HttpClient,
    /// None when no API key is configured; every call then fails fast
    base_url: Option<String>,
}

impl AlchemyClient {
    pub fn new(config: &AlchemyConfig) -> Result<Self, String> {
        let base_url = config
            .api_key
            .as_ref()
            .map(|key| format!("https://{}.g.alchemy.com/v2/{}", config.network, key));
        if base_url.is_none() {
            logger::warning(
                LogTag::Api,
                "ALCHEMY_API_KEY not set - portfolio lookups will be rejected",
            );
        }
        Ok(Self {
            http_client: HttpClient::new(TIMEOUT_SECS)?,
            base_url,
        })
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, AlchemyError> {
        let base_url = self.base_url.as_ref().ok_or(AlchemyError::NotConfigured)?;

        logger::debug(LogTag::Api, &format!("[ALCHEMY] {}", method));

        let response = self
            .http_client
            .client()
            .post(base_url)
            .json(&RpcRequest::new(method, params))
            .send()
            .await
            .map_err(|e| AlchemyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlchemyError::InvalidResponse(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let envelope: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| AlchemyError::InvalidResponse(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(AlchemyError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| AlchemyError::InvalidResponse("missing result".to_string()))
    }

    async fn token_metadata(&self, contract: &str) -> Result<TokenMetadataResult, AlchemyError> {
        self.rpc("alchemy_getTokenMetadata", json!([contract])).await
    }
}

#[async_trait]
impl BalanceApi for AlchemyClient {
    async fn balances(&self, address: &str) -> Result<BalancesResult, AlchemyError> {
        // native and token balance lookups have no data dependency
        let (native_balance, token_balances) = tokio::try_join!(
            self.rpc::<String>("eth_getBalance", json!([address, "latest"])),
            self.rpc::<TokenBalancesResult>("alchemy_getTokenBalances", json!([address])),
        )?;

        // drop zero/absent balances before paying for metadata lookups
        let held: Vec<RawTokenBalance> = token_balances
            .token_balances
            .into_iter()
            .filter(|t| !is_zero_hex(t.token_balance.as_deref()))
            .collect();

        let metadata = join_all(
            held.iter()
                .map(|t| self.token_metadata(&t.contract_address)),
        )
        .await;

        let mut tokens = Vec::with_capacity(held.len());
        for (raw, meta) in held.into_iter().zip(metadata) {
            let meta = meta?;
            tokens.push(TokenBalance {
                contract: raw.contract_address,
                symbol: meta.symbol.unwrap_or_default(),
                name: meta.name.unwrap_or_default(),
                decimals: meta.decimals.unwrap_or(18),
                balance: raw.token_balance.unwrap_or_default(),
            });
        }

        Ok(BalancesResult {
            native_balance,
            tokens,
        })
    }
}

/// Absent, empty, or all-zero hex balances count as "not held"
pub fn is_zero_hex(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(raw) => {
            let body = raw
                .strip_prefix("0x")
                .or_else(|| raw.strip_prefix("0X"))
                .unwrap_or(raw);
            body.is_empty() || body.chars().all(|c| c == '0')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hex_detection() {
        assert!(is_zero_hex(None));
        assert!(is_zero_hex(Some("0x0")));
        assert!(is_zero_hex(Some("0x")));
        assert!(is_zero_hex(Some(
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        )));
        assert!(!is_zero_hex(Some("0x1")));
        assert!(!is_zero_hex(Some(
            "0x0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        )));
    }

    #[test]
    fn test_unconfigured_client_fails_fast() {
        let client = AlchemyClient::new(&crate::config::AlchemyConfig {
            api_key: None,
            network: "eth-mainnet".to_string(),
        })
        .unwrap();
        assert!(client.base_url.is_none());
    }

    #[test]
    fn test_token_balances_parse() {
        let raw = serde_json::json!({
            "result": {
                "tokenBalances": [
                    {"contractAddress": "0xabc", "tokenBalance": "0x5f5e100"},
                    {"contractAddress": "0xdef", "tokenBalance": "0x0"}
                ]
            }
        });
        let parsed: RpcResponse<TokenBalancesResult> = serde_json::from_value(raw).unwrap();
        let result = parsed.result.unwrap();
        assert_eq!(result.token_balances.len(), 2);
        assert_eq!(result.token_balances[0].contract_address, "0xabc");
    }
}
