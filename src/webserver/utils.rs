/// Shared response builders for the API routes
use crate::validation::FieldError;
use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Name of the cache-status response header
pub const CACHE_HEADER: &str = "x-cache";

/// Whether a response was served from the TTL cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Plain 200 JSON response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// 200 JSON response tagged with the cache hit/miss header
pub fn cached_response<T: Serialize>(data: T, cache: CacheStatus) -> Response {
    let mut response = (StatusCode::OK, Json(data)).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(CACHE_HEADER),
        HeaderValue::from_static(cache.as_str()),
    );
    response
}

/// 400 response carrying the per-field validation failures
pub fn validation_error_response(message: &str, errors: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": message,
            "details": errors,
        })),
    )
        .into_response()
}

/// 502 response for an upstream provider failure
pub fn upstream_error_response(message: &str, status: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": message,
            "status": status,
        })),
    )
        .into_response()
}

/// Generic error response with an application code and optional details
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<Value>,
) -> Response {
    let mut body = json!({
        "error": code,
        "message": message,
    });
    if let Some(details) = details {
        body["details"] = details;
    }
    (status, Json(body)).into_response()
}
