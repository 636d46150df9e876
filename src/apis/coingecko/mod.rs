/// CoinGecko API client
///
/// API Documentation: https://docs.coingecko.com/reference/introduction
///
/// Endpoints implemented:
/// 1. /coins/markets         - paged market listing
/// 2. /coins/{id}            - full coin metadata
/// 3. /coins/{id}/market_chart - price time series
/// 4. /simple/price          - batched USD spot prices
pub mod types;

use crate::apis::client::HttpClient;
use crate::config::CoinGeckoConfig;
use crate::logger::{self, LogTag};
use crate::validation::MarketOrder;
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

pub use self::types::{CoinGeckoError, CoinMarketRow, SimplePriceEntry, SimplePriceResponse};

/// Request timeout - CoinGecko can be slow with large datasets
const TIMEOUT_SECS: u64 = 20;

/// Characters of a malformed body kept in invalid_json diagnostics
const BODY_SNIPPET_LEN: usize = 180;

const USER_AGENT: &str = "CryptoTracker/1.0 (+https://localhost)";

/// Typed market-data surface the aggregation handlers depend on; the
/// concrete client is swapped for a counting mock in tests.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    async fn markets(
        &self,
        currency: &str,
        page_size: u32,
        page: u32,
        order: MarketOrder,
    ) -> Result<Vec<CoinMarketRow>, CoinGeckoError>;

    async fn coin_detail(&self, id: &str) -> Result<Value, CoinGeckoError>;

    async fn market_chart(
        &self,
        id: &str,
        currency: &str,
        days: &str,
    ) -> Result<Value, CoinGeckoError>;

    async fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, CoinGeckoError>;
}

pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(config: &CoinGeckoConfig) -> Result<Self, String> {
        Ok(Self {
            http_client: HttpClient::new(TIMEOUT_SECS)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Raw fetch: joins the configured base with `path`, appends all `Some`
    /// query values as strings, reads the body as text and parses it.
    ///
    /// Failure surfaces as `CoinGeckoError` with `status` set to
    /// `network_error`, `invalid_json`, or the upstream HTTP status.
    pub async fn fetch(
        &self,
        path: &str,
        query: &[(&str, Option<String>)],
    ) -> Result<Value, CoinGeckoError> {
        let url = self.build_url(path, query)?;

        logger::debug(LogTag::Api, &format!("[COINGECKO] GET {}", url));

        let mut request = self
            .http_client
            .client()
            .get(url)
            .header("accept", "application/json")
            .header("user-agent", USER_AGENT);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoinGeckoError::network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoinGeckoError::network(e.to_string()))?;

        let data: Value = if text.is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(data) => data,
                Err(_) => {
                    let snippet = body_snippet(&text);
                    let message = if snippet.is_empty() {
                        format!("Failed to parse JSON (HTTP {})", status.as_u16())
                    } else {
                        format!(
                            "Failed to parse JSON (HTTP {}, body: {})",
                            status.as_u16(),
                            snippet
                        )
                    };
                    return Err(CoinGeckoError::invalid_json(message));
                }
            }
        };

        if !status.is_success() {
            let message = data
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Upstream request failed")
                        .to_string()
                });
            return Err(CoinGeckoError::upstream(status.as_u16(), message));
        }

        Ok(data)
    }

    fn build_url(
        &self,
        path: &str,
        query: &[(&str, Option<String>)],
    ) -> Result<Url, CoinGeckoError> {
        let base = if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        };
        let normalized = path.trim_start_matches('/');
        let mut url = Url::parse(&base)
            .and_then(|base| base.join(normalized))
            .map_err(|e| CoinGeckoError::network(format!("Invalid request URL: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                if let Some(value) = value {
                    pairs.append_pair(key, value);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

#[async_trait]
impl MarketDataApi for CoinGeckoClient {
    async fn markets(
        &self,
        currency: &str,
        page_size: u32,
        page: u32,
        order: MarketOrder,
    ) -> Result<Vec<CoinMarketRow>, CoinGeckoError> {
        let data = self
            .fetch(
                "coins/markets",
                &[
                    ("vs_currency", Some(currency.to_string())),
                    ("per_page", Some(page_size.to_string())),
                    ("page", Some(page.to_string())),
                    ("order", Some(order.as_str().to_string())),
                ],
            )
            .await?;
        serde_json::from_value(data)
            .map_err(|e| CoinGeckoError::invalid_json(format!("Unexpected markets shape: {}", e)))
    }

    async fn coin_detail(&self, id: &str) -> Result<Value, CoinGeckoError> {
        // community/developer/tickers/sparkline/localization excluded to
        // keep the payload small; market data stays in
        self.fetch(
            &format!("coins/{}", id),
            &[
                ("localization", Some("false".to_string())),
                ("tickers", Some("false".to_string())),
                ("market_data", Some("true".to_string())),
                ("community_data", Some("false".to_string())),
                ("developer_data", Some("false".to_string())),
                ("sparkline", Some("false".to_string())),
            ],
        )
        .await
    }

    async fn market_chart(
        &self,
        id: &str,
        currency: &str,
        days: &str,
    ) -> Result<Value, CoinGeckoError> {
        self.fetch(
            &format!("coins/{}/market_chart", id),
            &[
                ("vs_currency", Some(currency.to_string())),
                ("days", Some(days.to_string())),
            ],
        )
        .await
    }

    async fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, CoinGeckoError> {
        let data = self
            .fetch(
                "simple/price",
                &[
                    ("ids", Some(ids.join(","))),
                    ("vs_currencies", Some("usd".to_string())),
                ],
            )
            .await?;
        serde_json::from_value(data).map_err(|e| {
            CoinGeckoError::invalid_json(format!("Unexpected simple/price shape: {}", e))
        })
    }
}

/// Whitespace-collapsed prefix of a malformed body for diagnostics
fn body_snippet(text: &str) -> String {
    let truncated: String = text.chars().take(BODY_SNIPPET_LEN).collect();
    truncated.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoinGeckoConfig;

    fn client() -> CoinGeckoClient {
        CoinGeckoClient::new(&CoinGeckoConfig {
            base_url: "https://api.example.com/api/v3".to_string(),
            api_key: None,
        })
        .unwrap()
    }

    #[test]
    fn test_build_url_joins_base_and_path() {
        let url = client()
            .build_url("coins/markets", &[("vs_currency", Some("usd".to_string()))])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v3/coins/markets?vs_currency=usd"
        );
    }

    #[test]
    fn test_build_url_skips_absent_params() {
        let url = client()
            .build_url(
                "/simple/price",
                &[("ids", Some("bitcoin".to_string())), ("x_total", None)],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/v3/simple/price?ids=bitcoin"
        );
    }

    #[test]
    fn test_body_snippet_collapses_whitespace() {
        let raw = "<html>\n  <body>   Rate\tlimited </body></html>";
        assert_eq!(body_snippet(raw), "<html> <body> Rate limited </body></html>");
        let long = "x".repeat(500);
        assert_eq!(body_snippet(&long).len(), BODY_SNIPPET_LEN);
    }

    #[test]
    fn test_market_rows_tolerate_null_numbers() {
        let raw = serde_json::json!([{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://img.example/btc.png",
            "current_price": 50000.0,
            "market_cap": null,
            "market_cap_rank": 1,
            "total_volume": null,
            "price_change_percentage_24h": -1.25
        }]);
        let rows: Vec<CoinMarketRow> = serde_json::from_value(raw).unwrap();
        assert_eq!(rows[0].id, "bitcoin");
        assert_eq!(rows[0].market_cap, None);
        assert_eq!(rows[0].price_change_percentage_24h, Some(-1.25));
    }
}
