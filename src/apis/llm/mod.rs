/// Completion backends
///
/// Each provider speaks its own wire format behind the shared `LlmClient`
/// trait; the active backend is chosen once at startup from `CHAT_BACKEND`.
pub mod ollama;
pub mod openai;
pub mod types;

use crate::config::ChatConfig;
use async_trait::async_trait;
use std::sync::Arc;

pub use self::ollama::OllamaClient;
pub use self::openai::OpenAiClient;
pub use self::types::{
    ChatMessage, CompletionRequest, CompletionResponse, LlmError, MessageRole,
};

/// A text-completion provider
#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn call(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Build the configured backend. An unknown selector is a startup error;
/// missing credentials are not - they surface per-call as `NotConfigured`
/// so the rest of the dashboard keeps working.
pub fn build_backend(config: &ChatConfig) -> Result<Arc<dyn LlmClient>, String> {
    match config.backend.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )?)),
        "ollama" => Ok(Arc::new(OllamaClient::new(
            config.ollama_base_url.clone(),
            config.ollama_model.clone(),
        )?)),
        other => Err(format!(
            "Unknown CHAT_BACKEND '{}' (expected 'openai' or 'ollama')",
            other
        )),
    }
}
