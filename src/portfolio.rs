//! Portfolio valuation
//!
//! Combines raw balances with resolved spot prices. Unknown amounts and
//! unresolved prices stay in the output as nulls; only finite USD values
//! contribute to the total. Valuations are computed per request and never
//! cached - live balances must not be served stale.

use crate::apis::alchemy::BalancesResult;
use crate::units::{decimal_to_f64, hex_balance_to_decimal};
use serde::Serialize;
use std::collections::HashMap;

pub const NATIVE_SYMBOL: &str = "ETH";
pub const NATIVE_DECIMALS: u32 = 18;

/// Native holding with resolved pricing
#[derive(Debug, Clone, Serialize)]
pub struct NativeHolding {
    pub symbol: &'static str,
    pub balance: String,
    pub usd_price: Option<f64>,
    pub usd_value: Option<f64>,
}

/// Token holding with resolved pricing
#[derive(Debug, Clone, Serialize)]
pub struct TokenHolding {
    pub contract: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    pub balance: String,
    pub usd_price: Option<f64>,
    pub usd_value: Option<f64>,
}

/// Full valuation for one address
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioValuation {
    pub address: String,
    pub native: NativeHolding,
    pub tokens: Vec<TokenHolding>,
    pub total_usd_value: f64,
}

/// Symbols to price: native plus every non-empty token symbol, duplicates
/// collapsed, input order preserved
pub fn symbols_to_price(balances: &BalancesResult) -> Vec<String> {
    let mut symbols = vec![NATIVE_SYMBOL.to_string()];
    for token in &balances.tokens {
        if !token.symbol.is_empty() && !symbols.contains(&token.symbol) {
            symbols.push(token.symbol.clone());
        }
    }
    symbols
}

/// amount x price when both are known and finite, else unknown
fn usd_value(amount: Option<f64>, price: Option<f64>) -> Option<f64> {
    match (amount, price) {
        (Some(amount), Some(price)) => {
            let value = amount * price;
            value.is_finite().then_some(value)
        }
        _ => None,
    }
}

/// Build the valuation from raw balances and resolved prices.
///
/// Every holding stays in the output even when its value is unknown; only
/// the total excludes (treats as zero) null or non-finite values.
pub fn build_valuation(
    address: &str,
    balances: BalancesResult,
    prices: &HashMap<String, Option<f64>>,
) -> PortfolioValuation {
    let resolved = |symbol: &str| -> Option<f64> { prices.get(symbol).copied().flatten() };

    let native_amount = hex_balance_to_decimal(&balances.native_balance, NATIVE_DECIMALS)
        .as_deref()
        .and_then(decimal_to_f64);
    let native_price = resolved(NATIVE_SYMBOL);
    let native = NativeHolding {
        symbol: NATIVE_SYMBOL,
        balance: balances.native_balance,
        usd_price: native_price,
        usd_value: usd_value(native_amount, native_price),
    };

    let tokens: Vec<TokenHolding> = balances
        .tokens
        .into_iter()
        .map(|token| {
            let amount = hex_balance_to_decimal(&token.balance, token.decimals)
                .as_deref()
                .and_then(decimal_to_f64);
            let price = if token.symbol.is_empty() {
                None
            } else {
                resolved(&token.symbol)
            };
            TokenHolding {
                contract: token.contract,
                symbol: token.symbol,
                name: token.name,
                decimals: token.decimals,
                balance: token.balance,
                usd_price: price,
                usd_value: usd_value(amount, price),
            }
        })
        .collect();

    let total_usd_value = std::iter::once(native.usd_value)
        .chain(tokens.iter().map(|t| t.usd_value))
        .filter_map(|value| value.filter(|v| v.is_finite()))
        .sum();

    PortfolioValuation {
        address: address.to_string(),
        native,
        tokens,
        total_usd_value,
    }
}
