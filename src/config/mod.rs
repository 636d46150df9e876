//! Application configuration
//!
//! All settings come from environment variables (a local `.env` file is
//! honored) with CLI overrides for the listen address. The loaded config is
//! stored in a process-wide `OnceCell` and handed to the webserver state, so
//! handlers never re-read the environment.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;

use crate::logger::{self, LogTag};

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_ALCHEMY_NETWORK: &str = "eth-mainnet";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;

/// TTL applied to every cached market response
pub const MARKET_CACHE_TTL_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub coingecko: CoinGeckoConfig,
    pub alchemy: AlchemyConfig,
    pub chat: ChatConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    /// Pro API key; absent means unauthenticated (rate-limited) access
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlchemyConfig {
    pub api_key: Option<String>,
    pub network: String,
}

/// Completion backend selection + per-backend credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// "openai" or "ollama"
    pub backend: String,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub ollama_base_url: String,
    pub ollama_model: Option<String>,
}

/// Settings surfaced to the browser client via /api/config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub refresh_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            coingecko: CoinGeckoConfig {
                base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
                api_key: None,
            },
            alchemy: AlchemyConfig {
                api_key: None,
                network: DEFAULT_ALCHEMY_NETWORK.to_string(),
            },
            chat: ChatConfig {
                backend: "openai".to_string(),
                openai_api_key: None,
                openai_model: None,
                ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
                ollama_model: None,
            },
            client: ClientConfig {
                refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            },
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(host) = env_string("HOST") {
            config.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("PORT") {
            config.server.port = port;
        }

        if let Some(base) = env_string("COINGECKO_BASE_URL") {
            config.coingecko.base_url = base;
        }
        config.coingecko.api_key = env_string("COINGECKO_API_KEY");

        config.alchemy.api_key = env_string("ALCHEMY_API_KEY");
        if let Some(network) = env_string("ALCHEMY_NETWORK") {
            config.alchemy.network = network;
        }

        if let Some(backend) = env_string("CHAT_BACKEND") {
            config.chat.backend = backend.to_lowercase();
        }
        config.chat.openai_api_key = env_string("OPENAI_API_KEY");
        config.chat.openai_model = env_string("OPENAI_MODEL");
        if let Some(base) = env_string("OLLAMA_BASE_URL") {
            config.chat.ollama_base_url = base;
        }
        config.chat.ollama_model = env_string("OLLAMA_MODEL");

        if let Some(interval) = env_parse::<u64>("REFRESH_INTERVAL_MS") {
            config.client.refresh_interval_ms = interval;
        }

        config
    }
}

fn env_string(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            logger::warning(
                LogTag::Config,
                &format!("Ignoring unparseable value for {}: {}", key, raw),
            );
            None
        }
    }
}

/// Install the global config (called once at startup)
pub fn set_config(config: Config) {
    GLOBAL_CONFIG.set(config).ok();
}

/// Clone the global config, or defaults if startup has not installed one
pub fn get_config_clone() -> Config {
    GLOBAL_CONFIG.get().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.coingecko.base_url, DEFAULT_COINGECKO_BASE_URL);
        assert!(config.coingecko.api_key.is_none());
        assert_eq!(config.alchemy.network, "eth-mainnet");
        assert_eq!(config.chat.backend, "openai");
        assert_eq!(config.client.refresh_interval_ms, 30_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"server\""));
        assert!(json.contains("\"coingecko\""));
        assert!(json.contains("\"chat\""));
    }
}
