/// Ollama API request/response types
///
/// These types match the Ollama Chat API format.
/// API Documentation: https://github.com/ollama/ollama/blob/main/docs/api.md
use serde::{Deserialize, Serialize};

/// Ollama Chat Completion Request
#[derive(Debug, Clone, Serialize)]
pub struct OllamaRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    /// Stream responses (always false for our use case)
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate (num_predict in Ollama)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Message in Ollama format
#[derive(Debug, Clone, Serialize)]
pub struct OllamaMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

/// Ollama Chat Completion Response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaResponse {
    pub model: String,
    pub message: OllamaResponseMessage,
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaResponseMessage {
    #[serde(default)]
    pub content: String,
}
