//! Batched USD price resolution
//!
//! Symbols from the balance provider are mapped to market-data provider
//! identifiers: a fixed table covers the well-known assets, anything else is
//! tried lower-cased as an id. One batched /simple/price call resolves every
//! unique id; inputs that resolve to nothing map to `None`, never an error.

use crate::apis::coingecko::{CoinGeckoError, MarketDataApi};
use std::collections::HashMap;

/// Well-known symbol -> provider id mappings
const SYMBOL_TO_ID: [(&str, &str); 5] = [
    ("ETH", "ethereum"),
    ("USDC", "usd-coin"),
    ("USDT", "tether"),
    ("DAI", "dai"),
    ("WBTC", "wrapped-bitcoin"),
];

/// Map a symbol or raw id to the provider identifier used for lookup
pub fn to_provider_id(symbol_or_id: &str) -> String {
    let trimmed = symbol_or_id.trim();
    let upper = trimmed.to_uppercase();
    for (symbol, id) in SYMBOL_TO_ID {
        if symbol == upper {
            return id.to_string();
        }
    }
    trimmed.to_lowercase()
}

/// Resolve USD unit prices for a batch of symbols-or-ids.
///
/// Keys of the returned map are the inputs exactly as supplied (case
/// preserved); blank inputs are dropped, duplicates collapse into one
/// upstream id.
pub async fn usd_prices(
    market: &dyn MarketDataApi,
    inputs: &[String],
) -> Result<HashMap<String, Option<f64>>, CoinGeckoError> {
    let mut result: HashMap<String, Option<f64>> = HashMap::new();

    let normalized: Vec<&str> = inputs
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();
    if normalized.is_empty() {
        return Ok(result);
    }

    let mut input_to_id: HashMap<&str, String> = HashMap::new();
    let mut unique_ids: Vec<String> = Vec::new();
    for input in &normalized {
        let id = to_provider_id(input);
        if !unique_ids.contains(&id) {
            unique_ids.push(id.clone());
        }
        input_to_id.insert(*input, id);
        result.insert(input.to_string(), None);
    }

    let data = market.simple_price(&unique_ids).await?;

    for input in &normalized {
        let usd = input_to_id
            .get(input)
            .and_then(|id| data.get(id))
            .and_then(|entry| entry.usd)
            .filter(|price| price.is_finite());
        result.insert(input.to_string(), usd);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::coingecko::{CoinMarketRow, SimplePriceEntry, SimplePriceResponse};
    use crate::validation::MarketOrder;
    use async_trait::async_trait;
    use serde_json::Value;

    struct FixedPrices(SimplePriceResponse);

    #[async_trait]
    impl MarketDataApi for FixedPrices {
        async fn markets(
            &self,
            _currency: &str,
            _page_size: u32,
            _page: u32,
            _order: MarketOrder,
        ) -> Result<Vec<CoinMarketRow>, CoinGeckoError> {
            unimplemented!("not used by price resolution")
        }

        async fn coin_detail(&self, _id: &str) -> Result<Value, CoinGeckoError> {
            unimplemented!("not used by price resolution")
        }

        async fn market_chart(
            &self,
            _id: &str,
            _currency: &str,
            _days: &str,
        ) -> Result<Value, CoinGeckoError> {
            unimplemented!("not used by price resolution")
        }

        async fn simple_price(
            &self,
            _ids: &[String],
        ) -> Result<SimplePriceResponse, CoinGeckoError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(to_provider_id("ETH"), "ethereum");
        assert_eq!(to_provider_id("usdc"), "usd-coin");
        assert_eq!(to_provider_id("WBTC"), "wrapped-bitcoin");
        // unknown symbols fall back to lower-casing
        assert_eq!(to_provider_id("SHIB"), "shib");
        assert_eq!(to_provider_id(" Pepe "), "pepe");
    }

    #[tokio::test]
    async fn test_prices_keyed_by_input_case_preserved() {
        let mut data = SimplePriceResponse::new();
        data.insert("ethereum".to_string(), SimplePriceEntry { usd: Some(3000.0) });
        let market = FixedPrices(data);

        let prices = usd_prices(&market, &["ETH".to_string()]).await.unwrap();
        assert_eq!(prices.get("ETH"), Some(&Some(3000.0)));
    }

    #[tokio::test]
    async fn test_unresolvable_symbol_maps_to_none() {
        let market = FixedPrices(SimplePriceResponse::new());
        let prices = usd_prices(&market, &["MYSTERY".to_string()])
            .await
            .unwrap();
        assert_eq!(prices.get("MYSTERY"), Some(&None));
    }

    #[tokio::test]
    async fn test_blank_inputs_dropped_without_network() {
        let market = FixedPrices(SimplePriceResponse::new());
        let prices = usd_prices(&market, &["".to_string(), "  ".to_string()])
            .await
            .unwrap();
        assert!(prices.is_empty());
    }
}
