use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;

use cryptotracker::{
    ai::ChatEngine,
    apis::{alchemy::AlchemyClient, coingecko::CoinGeckoClient, llm},
    cache::{SystemClock, TtlCache},
    config::{self, Config},
    logger::{self, LogTag},
    webserver::{self, AppState},
};

/// CryptoTracker API server
#[derive(Debug, Parser)]
#[command(name = "cryptotracker", about = "Market-data dashboard backend")]
struct Args {
    /// Bind host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    logger::set_debug(args.debug);

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config::set_config(config.clone());

    logger::info(LogTag::System, "CryptoTracker starting up...");

    let market = Arc::new(
        CoinGeckoClient::new(&config.coingecko).map_err(|e| anyhow!(e))?,
    );
    let balances = Arc::new(
        AlchemyClient::new(&config.alchemy).map_err(|e| anyhow!(e))?,
    );
    let llm_backend = llm::build_backend(&config.chat).map_err(|e| anyhow!(e))?;
    logger::info(
        LogTag::System,
        &format!("Chat backend: {}", config.chat.backend),
    );

    let cache = Arc::new(TtlCache::new(Arc::new(SystemClock)));
    let chat = Arc::new(ChatEngine::new(market.clone(), llm_backend));

    let state = Arc::new(AppState::new(config, cache, market, balances, chat));

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::info(LogTag::System, "Ctrl-C received, shutting down");
            webserver::shutdown();
        }
    });

    webserver::start_server(state).await.map_err(|e| anyhow!(e))
}
