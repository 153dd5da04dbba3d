//! Paper-trading quoting agent.
//!
//! Runs the top-of-book strategy against the in-memory simulated venue.
//! Wiring a real venue in means swapping the `SimVenue` construction for
//! implementations of `MarketData` and `OrderGateway`.

use std::sync::Arc;

use anyhow::Result;
use quote_bot::bin_common::{load_config_from_env, ConfigType};
use quoter::application::{Strategy, StrategyContext, TopOfBookStrategy};
use quoter::domain::PriceLevel;
use quoter::infrastructure::{logging, QuoterConfig, SimVenue};
use quoter::utils::ShutdownManager;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config_path = load_config_from_env(ConfigType::Quoter);
    let config = QuoterConfig::load(&config_path)?;

    logging::init_tracing(&config.log_level);
    config.log();

    info!("");
    info!("========================================");
    info!("Starting Quote Bot (paper mode)");
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");

    let shutdown = Arc::new(ShutdownManager::new());
    shutdown.spawn_signal_handler();

    // Paper venue with a plausible starting book around 100.00.
    let venue = SimVenue::new();
    venue.seed_market(
        &config.market,
        vec![
            PriceLevel::new(99.98, 25.0),
            PriceLevel::new(99.95, 60.0),
            PriceLevel::new(99.90, 140.0),
        ],
        vec![
            PriceLevel::new(100.03, 20.0),
            PriceLevel::new(100.06, 55.0),
            PriceLevel::new(100.12, 130.0),
        ],
    );

    let ctx = StrategyContext::new(
        Arc::clone(&shutdown),
        Arc::new(venue.clone()),
        Arc::new(venue.clone()),
    );

    let mut strategy = TopOfBookStrategy::new(config);
    info!("Strategy: {} - {}", strategy.name(), strategy.description());

    let result = strategy.start(&ctx).await;

    info!("");
    info!("========================================");
    info!("Quote Bot stopped gracefully");
    info!("========================================");

    result?;
    Ok(())
}
