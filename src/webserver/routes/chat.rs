//! Chat route
//!
//! Validates the request body, then hands the turn to the chat engine.
//! Provider failures of any kind collapse into one fixed 502 payload.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    ai::{PageContext, DISCLAIMER},
    logger::{self, LogTag},
    validation::validate_chat_message,
    webserver::{
        state::AppState,
        utils::{error_response, success_response},
    },
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(post_chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub use_page_context: bool,
    #[serde(default)]
    pub page_context: Option<PageContext>,
}

async fn post_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                &rejection.body_text(),
                None,
            );
        }
    };

    let message = match validate_chat_message(&body.message) {
        Ok(message) => message,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body", &e.message, None)
        }
    };

    let context = if body.use_page_context {
        body.page_context
    } else {
        None
    };

    match state.chat.handle(&message, context).await {
        Ok(reply) => success_response(json!({
            "reply": reply,
            "disclaimer": DISCLAIMER,
        })),
        Err(e) => {
            logger::warning(LogTag::Chat, &format!("Chat turn failed: {}", e));
            error_response(
                StatusCode::BAD_GATEWAY,
                "chat_provider_error",
                &e.to_string(),
                None,
            )
        }
    }
}
