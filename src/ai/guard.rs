//! Chat guardrails
//!
//! Fixed rule tables applied before any completion call: disallowed-intent
//! refusals, direct price-question detection, and redaction of secret-like
//! material from page context. All patterns are compiled once at startup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Canned reply for disallowed requests
pub const REFUSAL_REPLY: &str = "I can't help with that. I don't handle secret material, \
trading instructions, or claims about guaranteed returns. Happy to explain market data or \
how the dashboard works instead.";

/// Hard cap applied to every outgoing reply
pub const MAX_REPLY_LEN: usize = 600;

/// Cap applied to each page-context text field before inclusion
pub const MAX_CONTEXT_FIELD_LEN: usize = 200;

/// Replacement marker for redacted spans
const REDACTED: &str = "[redacted]";

/// Disallowed-intent patterns: secret material, market manipulation,
/// guaranteed returns, direct buy/sell instructions
static REFUSAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(seed phrase|private key|secret recovery|mnemonic|api key|wallet password)\b",
        r"(?i)\b(pump and dump|pump-and-dump|wash trad\w*|spoof\w* the (order book|market)|manipulat\w* the (price|market))\b",
        r"(?i)\b(guaranteed (return|profit|gain)s?|risk[- ]free (profit|return)s?|can'?t lose)\b",
        r"(?i)\b(should i (buy|sell)|tell me (what|when) to (buy|sell)|(buy|sell) signal for)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid refusal pattern"))
    .collect()
});

/// API-key-shaped tokens (provider-prefixed opaque strings)
static API_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:sk|pk|rk|key|token)[-_][A-Za-z0-9_-]{16,}\b").expect("invalid key pattern")
});

/// 64 hex digits: raw private keys and tx hashes
static HEX64_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:0x)?[0-9a-fA-F]{64}\b").expect("invalid hex pattern"));

/// Price-question cue words
static PRICE_CUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(price|how much|worth|trading at)\b").expect("invalid price cue pattern")
});

/// Alias table for assets the assistant may quote directly
const PRICE_ALIASES: [(&str, &str, &str); 10] = [
    ("btc", "bitcoin", "Bitcoin"),
    ("bitcoin", "bitcoin", "Bitcoin"),
    ("eth", "ethereum", "Ethereum"),
    ("ethereum", "ethereum", "Ethereum"),
    ("sol", "solana", "Solana"),
    ("solana", "solana", "Solana"),
    ("doge", "dogecoin", "Dogecoin"),
    ("dogecoin", "dogecoin", "Dogecoin"),
    ("ada", "cardano", "Cardano"),
    ("cardano", "cardano", "Cardano"),
];

/// True when the message matches a disallowed-intent pattern
pub fn is_disallowed(message: &str) -> bool {
    REFUSAL_PATTERNS.iter().any(|p| p.is_match(message))
}

/// Detect a simple current-price question; returns (provider id, display
/// name) when the message names a known asset alongside a price cue
pub fn price_intent(message: &str) -> Option<(&'static str, &'static str)> {
    if !PRICE_CUE_PATTERN.is_match(message) {
        return None;
    }
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    for (alias, id, display) in PRICE_ALIASES {
        if words.contains(&alias) {
            return Some((id, display));
        }
    }
    None
}

/// Redact secret-like spans from a context field
pub fn redact(text: &str) -> String {
    if looks_like_seed_phrase(text) {
        return REDACTED.to_string();
    }
    let text = API_KEY_PATTERN.replace_all(text, REDACTED);
    HEX64_PATTERN.replace_all(&text, REDACTED).into_owned()
}

/// 12- or 24-word runs of plain lowercase words are treated as recovery
/// phrases
fn looks_like_seed_phrase(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() != 12 && words.len() != 24 {
        return false;
    }
    words
        .iter()
        .all(|w| w.len() >= 3 && w.chars().all(|c| c.is_ascii_lowercase()))
}

/// Truncate on a character boundary
pub fn cap_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Final hard cap on outgoing replies
pub fn truncate_reply(reply: &str) -> String {
    cap_chars(reply.trim(), MAX_REPLY_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refuses_secret_material_requests() {
        assert!(is_disallowed("what is your api key"));
        assert!(is_disallowed("give me the seed phrase for the demo wallet"));
        assert!(is_disallowed("Show me a private key"));
    }

    #[test]
    fn test_refuses_manipulation_and_hype() {
        assert!(is_disallowed("how do I pump and dump a microcap"));
        assert!(is_disallowed("best coin for guaranteed returns"));
        assert!(is_disallowed("is this a risk-free profit"));
    }

    #[test]
    fn test_refuses_direct_trade_instructions() {
        assert!(is_disallowed("should i buy ETH today"));
        assert!(is_disallowed("tell me when to sell"));
    }

    #[test]
    fn test_allows_benign_questions() {
        assert!(!is_disallowed("what is market capitalization?"));
        assert!(!is_disallowed("explain the 24h volume column"));
    }

    #[test]
    fn test_price_intent_aliases() {
        assert_eq!(
            price_intent("what is the price of BTC?"),
            Some(("bitcoin", "Bitcoin"))
        );
        assert_eq!(
            price_intent("how much is solana right now"),
            Some(("solana", "Solana"))
        );
        // a cue without a known asset is not a price question
        assert_eq!(price_intent("what is the price of my NFT"), None);
        // a known asset without a cue is not a price question
        assert_eq!(price_intent("ethereum gas fees are annoying"), None);
    }

    #[test]
    fn test_redacts_api_key_shaped_tokens() {
        let redacted = redact("my key is sk-abcdefghijklmnop1234 ok");
        assert!(!redacted.contains("sk-abcdefghijklmnop1234"));
        assert!(redacted.contains("[redacted]"));
    }

    #[test]
    fn test_redacts_64_hex_strings() {
        let secret = "a".repeat(64);
        let redacted = redact(&format!("hash {} end", secret));
        assert!(!redacted.contains(&secret));
        let prefixed = format!("0x{}", "b".repeat(64));
        assert!(!redact(&prefixed).contains(&prefixed));
    }

    #[test]
    fn test_redacts_seed_phrases() {
        let phrase = vec!["correct"; 12].join(" ");
        assert_eq!(redact(&phrase), "[redacted]");
        let phrase24 = vec!["horse"; 24].join(" ");
        assert_eq!(redact(&phrase24), "[redacted]");
        // ordinary prose survives
        assert_eq!(redact("top movers today"), "top movers today");
    }

    #[test]
    fn test_reply_truncation() {
        let long = "x".repeat(700);
        assert_eq!(truncate_reply(&long).chars().count(), MAX_REPLY_LEN);
        assert_eq!(truncate_reply("short"), "short");
    }
}
