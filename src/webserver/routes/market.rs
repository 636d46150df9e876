//! Market data routes
//!
//! Top coins listing, per-coin detail, and chart series. Each handler
//! validates its inputs, probes the TTL cache, and only then calls the
//! market-data adapter; responses carry the cache hit/miss header.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    config::MARKET_CACHE_TTL_MS,
    logger::{self, LogTag},
    validation::{
        validate_coin_id, validate_currency, validate_days, validate_order, validate_page,
        validate_page_size, FieldError,
    },
    webserver::{
        state::AppState,
        utils::{cached_response, upstream_error_response, validation_error_response, CacheStatus},
    },
};

/// Sanitized descriptions are capped at this many characters, ellipsis
/// included
const MAX_DESCRIPTION_LEN: usize = 300;
const ELLIPSIS: &str = "...";

static HTML_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid tag pattern"));

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/top", get(get_top_coins))
        .route("/coin/:id", get(get_coin_detail))
        .route("/coin/:id/chart", get(get_coin_chart))
}

// ==================== Query Parameters ====================

/// Raw top-coins query; parsed as strings so validation owns every error
#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub currency: Option<String>,
    pub page_size: Option<String>,
    pub page: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub currency: Option<String>,
    pub days: Option<String>,
}

/// One point of a chart series: unix seconds + price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub t: i64,
    pub p: f64,
}

// ==================== Route Handlers ====================

async fn get_top_coins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> Response {
    let mut errors: Vec<FieldError> = Vec::new();
    let currency = validate_currency(query.currency.as_deref()).unwrap_or_else(|e| {
        errors.push(e);
        String::new()
    });
    let page_size = validate_page_size(query.page_size.as_deref()).unwrap_or_else(|e| {
        errors.push(e);
        0
    });
    let page = validate_page(query.page.as_deref()).unwrap_or_else(|e| {
        errors.push(e);
        0
    });
    let order = validate_order(query.order.as_deref()).map_err(|e| errors.push(e));
    if !errors.is_empty() {
        return validation_error_response("Invalid query", errors);
    }
    let order = order.unwrap();

    let cache_key = format!(
        "top:{}:{}:{}:{}",
        currency,
        page_size,
        page,
        order.as_str()
    );
    if let Some(cached) = state.cache.get(&cache_key) {
        return cached_response(json!({ "coins": cached }), CacheStatus::Hit);
    }

    match state.market.markets(&currency, page_size, page, order).await {
        Ok(rows) => {
            let coins = serde_json::to_value(rows).unwrap_or_else(|_| json!([]));
            state.cache.set(&cache_key, coins.clone(), MARKET_CACHE_TTL_MS);
            cached_response(json!({ "coins": coins }), CacheStatus::Miss)
        }
        Err(e) => {
            logger::warning(LogTag::Market, &format!("Top coins fetch failed: {}", e));
            upstream_error_response(&e.message, &e.status)
        }
    }
}

async fn get_coin_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id = match validate_coin_id(&id) {
        Ok(id) => id,
        Err(e) => return validation_error_response("Invalid coin id", vec![e]),
    };

    let cache_key = format!("coin:{}", id);
    if let Some(cached) = state.cache.get(&cache_key) {
        return cached_response(cached, CacheStatus::Hit);
    }

    match state.market.coin_detail(&id).await {
        Ok(data) => {
            let detail = shape_coin_detail(&data);
            state.cache.set(&cache_key, detail.clone(), MARKET_CACHE_TTL_MS);
            cached_response(detail, CacheStatus::Miss)
        }
        Err(e) => {
            logger::warning(LogTag::Market, &format!("Coin detail fetch failed: {}", e));
            upstream_error_response(&e.message, &e.status)
        }
    }
}

async fn get_coin_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Response {
    let mut errors: Vec<FieldError> = Vec::new();
    let id = validate_coin_id(&id).unwrap_or_else(|e| {
        errors.push(e);
        String::new()
    });
    let currency = validate_currency(query.currency.as_deref()).unwrap_or_else(|e| {
        errors.push(e);
        String::new()
    });
    let days = validate_days(query.days.as_deref()).unwrap_or_else(|e| {
        errors.push(e);
        String::new()
    });
    if !errors.is_empty() {
        return validation_error_response("Invalid query", errors);
    }

    let cache_key = format!("chart:{}:{}:{}", id, currency, days);
    if let Some(cached) = state.cache.get(&cache_key) {
        return cached_response(cached, CacheStatus::Hit);
    }

    match state.market.market_chart(&id, &currency, &days).await {
        Ok(data) => {
            let series = transform_chart(&data);
            let body = json!({ "series": series });
            state.cache.set(&cache_key, body.clone(), MARKET_CACHE_TTL_MS);
            cached_response(body, CacheStatus::Miss)
        }
        Err(e) => {
            logger::warning(LogTag::Market, &format!("Chart fetch failed: {}", e));
            upstream_error_response(&e.message, &e.status)
        }
    }
}

// ==================== Reshaping ====================

/// Reduce the upstream coin document to the dashboard's detail shape
fn shape_coin_detail(data: &Value) -> Value {
    let description = data
        .pointer("/description/en")
        .and_then(Value::as_str)
        .unwrap_or("");
    // large image preferred, thumb as ordered fallback
    let image = first_present(
        &[
            data.pointer("/image/large").and_then(Value::as_str),
            data.pointer("/image/thumb").and_then(Value::as_str),
        ],
        "",
    );
    let homepage = data
        .pointer("/links/homepage")
        .and_then(Value::as_array)
        .and_then(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .find(|url| !url.is_empty())
        })
        .unwrap_or("");

    json!({
        "id": data.get("id").cloned().unwrap_or(Value::Null),
        "symbol": data.get("symbol").cloned().unwrap_or(Value::Null),
        "name": data.get("name").cloned().unwrap_or(Value::Null),
        "image": image,
        "homepage": homepage,
        "categories": data.get("categories").cloned().filter(Value::is_array).unwrap_or_else(|| json!([])),
        "description": sanitize_description(description),
        "market": data.get("market_data").cloned().filter(Value::is_object).unwrap_or_else(|| json!({})),
    })
}

/// First present (non-empty) candidate wins, in order; otherwise the
/// documented default
fn first_present<'a>(candidates: &[Option<&'a str>], default: &'a str) -> &'a str {
    candidates
        .iter()
        .find_map(|c| c.filter(|s| !s.is_empty()))
        .unwrap_or(default)
}

/// Strip markup, collapse whitespace, cap at 300 characters with a trailing
/// ellipsis marker
fn sanitize_description(raw: &str) -> String {
    let stripped = HTML_TAG_PATTERN.replace_all(raw, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_DESCRIPTION_LEN {
        let truncated: String = collapsed
            .chars()
            .take(MAX_DESCRIPTION_LEN - ELLIPSIS.len())
            .collect();
        format!("{}{}", truncated, ELLIPSIS)
    } else {
        collapsed
    }
}

/// Upstream `[timestamp_ms, price]` pairs to `{t, p}` seconds; anything
/// malformed yields an empty or partial series, never an error
fn transform_chart(data: &Value) -> Vec<ChartPoint> {
    data.get("prices")
        .and_then(Value::as_array)
        .map(|prices| {
            prices
                .iter()
                .filter_map(|pair| {
                    let pair = pair.as_array()?;
                    let ms = pair.first()?.as_f64()?;
                    let p = pair.get(1)?.as_f64()?;
                    Some(ChartPoint {
                        t: (ms as i64) / 1000,
                        p,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
