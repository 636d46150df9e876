//! Portfolio routes
//!
//! Live wallet valuation. Never served from the cache: balances must
//! reflect the chain at request time, so every call goes to the balance
//! and price adapters.

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    logger::{self, LogTag},
    portfolio::{build_valuation, symbols_to_price},
    prices,
    validation::validate_address,
    webserver::{
        state::AppState,
        utils::{success_response, upstream_error_response, validation_error_response},
    },
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/balances", get(get_portfolio_balances))
}

#[derive(Debug, Default, Deserialize)]
pub struct BalancesQuery {
    pub address: Option<String>,
}

async fn get_portfolio_balances(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BalancesQuery>,
) -> Response {
    let address = match validate_address(query.address.as_deref()) {
        Ok(address) => address,
        Err(e) => return validation_error_response("Invalid query", vec![e]),
    };

    let balances = match state.balances.balances(&address).await {
        Ok(balances) => balances,
        Err(e) => {
            logger::warning(LogTag::Portfolio, &format!("Balance fetch failed: {}", e));
            return upstream_error_response(&e.to_string(), e.status_label());
        }
    };

    let symbols = symbols_to_price(&balances);
    let resolved = match prices::usd_prices(state.market.as_ref(), &symbols).await {
        Ok(resolved) => resolved,
        Err(e) => {
            logger::warning(LogTag::Portfolio, &format!("Price lookup failed: {}", e));
            return upstream_error_response(&e.message, &e.status);
        }
    };

    success_response(build_valuation(&address, balances, &resolved))
}
