/// Shared application state for the webserver
///
/// Holds the config snapshot, the TTL cache, and the upstream adapter
/// handles route handlers depend on. Adapters sit behind trait objects so
/// tests can substitute counting mocks.
use crate::ai::ChatEngine;
use crate::apis::alchemy::BalanceApi;
use crate::apis::coingecko::MarketDataApi;
use crate::cache::TtlCache;
use crate::config::Config;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub cache: Arc<TtlCache>,
    pub market: Arc<dyn MarketDataApi>,
    pub balances: Arc<dyn BalanceApi>,
    pub chat: Arc<ChatEngine>,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        config: Config,
        cache: Arc<TtlCache>,
        market: Arc<dyn MarketDataApi>,
        balances: Arc<dyn BalanceApi>,
        chat: Arc<ChatEngine>,
    ) -> Self {
        Self {
            config,
            cache,
            market,
            balances,
            chat,
            startup_time: chrono::Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time)
            .num_seconds()
            .max(0) as u64
    }
}
