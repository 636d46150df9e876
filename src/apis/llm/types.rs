/// Core completion API types
///
/// Unified request/response types for the completion backends. Individual
/// providers transform these to/from their specific wire formats.
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MESSAGE TYPES
// ============================================================================

/// Chat message with role and content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Message role in a chat conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

/// Completion request in provider-neutral form
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Completion response in provider-neutral form
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub latency_ms: f64,
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Completion backend errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Required credential or model id absent; raised before any network call
    #[error("[{provider}] {message}")]
    NotConfigured { provider: String, message: String },

    #[error("[{provider}] Request timeout ({timeout_ms}ms)")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("[{provider}] Network error: {message}")]
    NetworkError { provider: String, message: String },

    #[error("[{provider}] Auth error: {message}")]
    AuthError { provider: String, message: String },

    #[error("[{provider}] Parse error: {message}")]
    ParseError { provider: String, message: String },

    #[error("[{provider}] API error {status_code}: {message}")]
    ApiError {
        provider: String,
        status_code: u16,
        message: String,
    },
}

impl From<LlmError> for String {
    fn from(err: LlmError) -> String {
        err.to_string()
    }
}
