/// Ollama API client (local models, raw HTTP via reqwest)
///
/// Endpoints:
/// - POST {base}/api/chat
///
/// No authentication; the base URL points at a local or LAN Ollama daemon.
pub mod types;

pub use self::types::{OllamaMessage, OllamaRequest, OllamaResponse, OllamaResponseMessage};

use crate::apis::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

const ENDPOINT_CHAT: &str = "/api/chat";
// Local generation is slow on modest hardware
const TIMEOUT_SECS: u64 = 120;

const PROVIDER: &str = "ollama";

pub struct OllamaClient {
    base_url: String,
    model: Option<String>,
    client: Client,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: String, model: Option<String>) -> Result<Self, String> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: Client::new(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn call(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = self.model.as_deref().ok_or_else(|| LlmError::NotConfigured {
            provider: PROVIDER.to_string(),
            message: "Missing OLLAMA_MODEL".to_string(),
        })?;

        let body = OllamaRequest {
            model: model.to_string(),
            messages: request
                .messages
                .into_iter()
                .map(|msg| OllamaMessage {
                    role: msg.role.to_string(),
                    content: msg.content,
                })
                .collect(),
            stream: false,
            temperature: request.temperature,
            num_predict: request.max_tokens,
        };
        let url = format!("{}{}", self.base_url, ENDPOINT_CHAT);

        logger::debug(
            LogTag::Api,
            &format!("[OLLAMA] Calling chat: model={}", body.model),
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        provider: PROVIDER.to_string(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    LlmError::NetworkError {
                        provider: PROVIDER.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                provider: PROVIDER.to_string(),
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: OllamaResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: PROVIDER.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        Ok(CompletionResponse {
            content: parsed.message.content.trim().to_string(),
            model: parsed.model,
            latency_ms,
        })
    }
}
