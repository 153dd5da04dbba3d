//! Order book viewer.
//!
//! Stands up the simulated venue, subscribes a book cache to it, and
//! prints the cached depth once a second while walking the book through
//! a deterministic drift. Useful for eyeballing cache behavior without
//! running the full quoting loop.

use anyhow::Result;
use quote_bot::bin_common::{load_config_from_env, ConfigType};
use quoter::domain::{PriceLevel, Side};
use quoter::infrastructure::{logging, BookCache, QuoterConfig, SimVenue};
use tokio::signal;
use tokio::time::{sleep, Duration};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config_path = load_config_from_env(ConfigType::Quoter);
    let config = QuoterConfig::load(&config_path)?;
    logging::init_tracing(&config.log_level);

    info!("Starting Book Viewer for {}", config.market);
    info!("Press Ctrl+C to stop");

    let venue = SimVenue::new();
    venue.seed_market(
        &config.market,
        vec![PriceLevel::new(99.98, 25.0), PriceLevel::new(99.95, 60.0)],
        vec![PriceLevel::new(100.03, 20.0), PriceLevel::new(100.06, 55.0)],
    );

    let cache = BookCache::new(config.market.clone());
    cache.initialize(&venue).await?;
    cache.subscribe(&venue).await?;

    let mut tick: u64 = 0;
    loop {
        // Saw-tooth drift: five ticks up, five ticks down.
        let step = (tick % 10) as f64;
        let drift = if step < 5.0 { step } else { 10.0 - step } * config.tick_size;

        venue.set_side(
            &config.market,
            Side::Bid,
            vec![
                PriceLevel::new(99.98 + drift, 25.0),
                PriceLevel::new(99.95 + drift, 60.0),
            ],
        );
        venue.set_side(
            &config.market,
            Side::Ask,
            vec![
                PriceLevel::new(100.03 + drift, 20.0),
                PriceLevel::new(100.06 + drift, 55.0),
            ],
        );

        let (bids, asks) = cache.depth();
        info!("{}", cache.format_summary());
        if let (Some(bids), Some(asks)) = (bids, asks) {
            info!("  bids: {}", serde_json::to_string(bids.levels())?);
            info!("  asks: {}", serde_json::to_string(asks.levels())?);
        }

        tick += 1;
        tokio::select! {
            _ = sleep(Duration::from_secs(1)) => {}
            _ = signal::ctrl_c() => {
                info!("");
                info!("Received shutdown signal (Ctrl+C)");
                break;
            }
        }
    }

    info!("Book Viewer stopped gracefully");
    Ok(())
}
