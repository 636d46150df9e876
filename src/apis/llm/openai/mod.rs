/// OpenAI API client (raw HTTP via reqwest)
///
/// Endpoints:
/// - POST https://api.openai.com/v1/chat/completions
///
/// Bearer token authentication; both the key and the model id come from the
/// environment and are required before any call goes out.
pub mod types;

pub use self::types::{
    OpenAiChoice, OpenAiErrorResponse, OpenAiMessage, OpenAiRequest, OpenAiResponse,
    OpenAiResponseMessage,
};

use crate::apis::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ENDPOINT_CHAT: &str = "/v1/chat/completions";
const TIMEOUT_SECS: u64 = 30;

const PROVIDER: &str = "openai";

pub struct OpenAiClient {
    api_key: Option<String>,
    model: Option<String>,
    client: Client,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Result<Self, String> {
        Ok(Self {
            api_key,
            model,
            client: Client::new(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        })
    }

    /// Credential check shared by every call; failing here means no network
    /// traffic was attempted
    fn credentials(&self) -> Result<(&str, &str), LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::NotConfigured {
            provider: PROVIDER.to_string(),
            message: "Missing OPENAI_API_KEY".to_string(),
        })?;
        let model = self.model.as_deref().ok_or_else(|| LlmError::NotConfigured {
            provider: PROVIDER.to_string(),
            message: "Missing OPENAI_MODEL".to_string(),
        })?;
        Ok((api_key, model))
    }

    fn build_request(&self, model: &str, request: CompletionRequest) -> OpenAiRequest {
        OpenAiRequest {
            model: model.to_string(),
            messages: request
                .messages
                .into_iter()
                .map(|msg| OpenAiMessage {
                    role: msg.role.to_string(),
                    content: msg.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn call(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (api_key, model) = self.credentials()?;
        let body = self.build_request(model, request);
        let url = format!("{}{}", OPENAI_BASE_URL, ENDPOINT_CHAT);

        logger::debug(
            LogTag::Api,
            &format!("[OPENAI] Calling chat completions: model={}", body.model),
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
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
            let body_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiErrorResponse>(&body_text)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or(body_text);

            return Err(match status.as_u16() {
                401 => LlmError::AuthError {
                    provider: PROVIDER.to_string(),
                    message: "Invalid API key".to_string(),
                },
                code => LlmError::ApiError {
                    provider: PROVIDER.to_string(),
                    status_code: code,
                    message,
                },
            });
        }

        let parsed: OpenAiResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: PROVIDER.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(CompletionResponse {
            content,
            model: parsed.model.unwrap_or_else(|| body.model.clone()),
            latency_ms,
        })
    }
}
