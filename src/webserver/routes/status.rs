//! Service status and client configuration routes

use axum::{extract::State, response::Response, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::webserver::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(get_status))
        .route("/config", get(get_client_config))
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: u64,
    cache_entries: usize,
}

#[derive(Debug, Serialize)]
struct ClientConfigResponse {
    refresh_interval_ms: u64,
}

async fn get_status(State(state): State<Arc<AppState>>) -> Response {
    crate::webserver::utils::success_response(StatusResponse {
        status: "ok",
        uptime_seconds: state.uptime_seconds(),
        cache_entries: state.cache.len(),
    })
}

async fn get_client_config(State(state): State<Arc<AppState>>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        refresh_interval_ms: state.config.client.refresh_interval_ms,
    })
}
