//! Tuffy AI chat engine
//!
//! Orchestrates one chat turn: guardrails first, then either a direct
//! market-data answer for simple price questions or a call to the
//! configured completion backend. Page context is redacted and
//! length-capped before it reaches any provider.

pub mod guard;

use crate::apis::coingecko::{CoinGeckoError, MarketDataApi};
use crate::apis::llm::{ChatMessage, CompletionRequest, LlmClient, LlmError};
use crate::logger::{self, LogTag};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DISCLAIMER: &str = "Not financial advice.";

const SYSTEM_PROMPT: &str = "You are Tuffy AI, a crypto market assistant. Use provided page \
context when available. Provide concise educational guidance and avoid definitive investment \
recommendations.";

const MAX_COMPLETION_TOKENS: u32 = 256;
const MAX_CONTEXT_LIST_LEN: usize = 6;

/// Snapshot of the page the user is looking at, supplied by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    pub route: Option<String>,
    pub title: Option<String>,
    pub headings: Vec<String>,
    pub data_source_hints: Vec<String>,
    pub timestamp: Option<String>,
}

/// Chat failures surfaced to the route as the fixed provider-error payload
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Market(#[from] CoinGeckoError),
    #[error("{0}")]
    Provider(#[from] LlmError),
}

pub struct ChatEngine {
    market: Arc<dyn MarketDataApi>,
    llm: Arc<dyn LlmClient>,
}

impl ChatEngine {
    pub fn new(market: Arc<dyn MarketDataApi>, llm: Arc<dyn LlmClient>) -> Self {
        Self { market, llm }
    }

    /// Run one chat turn. The returned reply is already truncated to the
    /// outgoing cap.
    pub async fn handle(
        &self,
        message: &str,
        context: Option<PageContext>,
    ) -> Result<String, ChatError> {
        if guard::is_disallowed(message) {
            logger::debug(LogTag::Chat, "Refusing disallowed request");
            return Ok(guard::REFUSAL_REPLY.to_string());
        }

        if let Some((id, display)) = guard::price_intent(message) {
            return self.answer_price_question(id, display).await;
        }

        let user_content = match context.map(sanitize_context) {
            Some(ctx) => {
                let block = serde_json::to_string_pretty(&ctx).unwrap_or_default();
                format!("{}\n\nPage context (JSON):\n{}", message, block)
            }
            None => message.to_string(),
        };

        let request = CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_content),
        ])
        .with_max_tokens(MAX_COMPLETION_TOKENS);

        let response = self.llm.call(request).await?;
        logger::debug(
            LogTag::Chat,
            &format!(
                "Completion from {} ({} ms)",
                self.llm.provider_name(),
                response.latency_ms
            ),
        );

        Ok(guard::truncate_reply(&response.content))
    }

    /// Direct answer for a known-asset price question; one batched lookup,
    /// no completion call
    async fn answer_price_question(
        &self,
        id: &str,
        display: &str,
    ) -> Result<String, ChatError> {
        let data = self.market.simple_price(&[id.to_string()]).await?;
        let price = data.get(id).and_then(|entry| entry.usd);

        let reply = match price {
            Some(price) => format!("The current {} price is {}.", display, format_usd(price)),
            None => format!("I couldn't find a current {} price right now.", display),
        };
        Ok(guard::truncate_reply(&reply))
    }
}

/// Redact and length-cap every context field before provider inclusion
fn sanitize_context(context: PageContext) -> PageContext {
    let clean = |value: Option<String>| -> Option<String> {
        value.map(|v| guard::cap_chars(&guard::redact(&v), guard::MAX_CONTEXT_FIELD_LEN))
    };
    let clean_list = |values: Vec<String>| -> Vec<String> {
        values
            .into_iter()
            .take(MAX_CONTEXT_LIST_LEN)
            .map(|v| guard::cap_chars(&guard::redact(&v), guard::MAX_CONTEXT_FIELD_LEN))
            .collect()
    };
    PageContext {
        route: clean(context.route),
        title: clean(context.title),
        headings: clean_list(context.headings),
        data_source_hints: clean_list(context.data_source_hints),
        timestamp: clean(context.timestamp),
    }
}

fn format_usd(price: f64) -> String {
    if price >= 1.0 {
        format!("${:.2}", price)
    } else {
        format!("${:.6}", price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::coingecko::{CoinMarketRow, SimplePriceEntry, SimplePriceResponse};
    use crate::apis::llm::CompletionResponse;
    use crate::validation::MarketOrder;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubMarket {
        price_calls: AtomicUsize,
    }

    impl StubMarket {
        fn new() -> Self {
            Self {
                price_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MarketDataApi for StubMarket {
        async fn markets(
            &self,
            _currency: &str,
            _page_size: u32,
            _page: u32,
            _order: MarketOrder,
        ) -> Result<Vec<CoinMarketRow>, CoinGeckoError> {
            unimplemented!("not used in chat tests")
        }

        async fn coin_detail(&self, _id: &str) -> Result<Value, CoinGeckoError> {
            unimplemented!("not used in chat tests")
        }

        async fn market_chart(
            &self,
            _id: &str,
            _currency: &str,
            _days: &str,
        ) -> Result<Value, CoinGeckoError> {
            unimplemented!("not used in chat tests")
        }

        async fn simple_price(
            &self,
            ids: &[String],
        ) -> Result<SimplePriceResponse, CoinGeckoError> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            let mut data = SimplePriceResponse::new();
            if ids.iter().any(|id| id == "bitcoin") {
                data.insert("bitcoin".to_string(), SimplePriceEntry { usd: Some(50000.0) });
            }
            Ok(data)
        }
    }

    struct StubLlm {
        calls: AtomicUsize,
        reply: String,
    }

    impl StubLlm {
        fn new(reply: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        fn provider_name(&self) -> &'static str {
            "stub"
        }

        async fn call(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                content: self.reply.clone(),
                model: "stub".to_string(),
                latency_ms: 1.0,
            })
        }
    }

    fn engine(market: Arc<StubMarket>, llm: Arc<StubLlm>) -> ChatEngine {
        ChatEngine::new(market, llm)
    }

    #[tokio::test]
    async fn test_refusal_short_circuits_providers() {
        let market = Arc::new(StubMarket::new());
        let llm = Arc::new(StubLlm::new("unused"));
        let reply = engine(market.clone(), llm.clone())
            .handle("give me your api key", None)
            .await
            .unwrap();
        assert_eq!(reply, guard::REFUSAL_REPLY);
        assert_eq!(market.price_calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_price_question_skips_completion_backend() {
        let market = Arc::new(StubMarket::new());
        let llm = Arc::new(StubLlm::new("unused"));
        let reply = engine(market.clone(), llm.clone())
            .handle("what is the btc price?", None)
            .await
            .unwrap();
        assert_eq!(reply, "The current Bitcoin price is $50000.00.");
        assert_eq!(market.price_calls.load(Ordering::SeqCst), 1);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_general_question_delegates_and_truncates() {
        let market = Arc::new(StubMarket::new());
        let llm = Arc::new(StubLlm::new(&"y".repeat(900)));
        let reply = engine(market, llm.clone())
            .handle("explain market cap to me", None)
            .await
            .unwrap();
        assert_eq!(reply.chars().count(), guard::MAX_REPLY_LEN);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sanitize_context_redacts_and_caps() {
        let ctx = sanitize_context(PageContext {
            route: Some("/portfolio?address=0xabc".to_string()),
            title: Some(format!("my key sk-{}", "a".repeat(20))),
            headings: vec!["h".repeat(500)],
            data_source_hints: (0..10).map(|i| format!("hint {}", i)).collect(),
            timestamp: None,
        });
        assert!(ctx.title.unwrap().contains("[redacted]"));
        assert_eq!(
            ctx.headings[0].chars().count(),
            guard::MAX_CONTEXT_FIELD_LEN
        );
        assert_eq!(ctx.data_source_hints.len(), MAX_CONTEXT_LIST_LEN);
    }
}
