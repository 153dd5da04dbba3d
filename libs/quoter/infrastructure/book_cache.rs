//! Locally cached view of one market's order book.
//!
//! Each side lives behind its own lock and is replaced wholesale by a
//! dedicated writer task consuming that side's notification stream, so a
//! reader never observes a half-applied notification. The two sides
//! update independently: `top_of_book` may pair a bid from time T1 with
//! an ask from time T2 > T1. That weak cross-side consistency is a
//! deliberate trade-off - holding one side's update until the other
//! arrives would add unbounded latency, since the venue gives no bound
//! on notification arrival order.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use super::venue::{MarketData, VenueError};
use crate::domain::{BookSide, Side};

type SideSlot = Arc<RwLock<Option<BookSide>>>;

#[derive(Debug, Error)]
pub enum BookError {
    /// No data for at least one side yet; callers recover with the
    /// fallback spread.
    #[error("order book for {0} is not ready")]
    NotReady(String),

    /// Initial full fetch failed. Fatal to cache startup: the cache
    /// never transitions to ready on partial success.
    #[error("failed to load order book for {market}")]
    Load {
        market: String,
        #[source]
        source: VenueError,
    },
}

/// Thread-safe order book cache for a single market.
pub struct BookCache {
    market: String,
    bids: SideSlot,
    asks: SideSlot,
}

impl BookCache {
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            bids: Arc::new(RwLock::new(None)),
            asks: Arc::new(RwLock::new(None)),
        }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    /// One-time full fetch of both sides. Populates the snapshot before
    /// any notification is processed; fails without becoming ready if
    /// either side cannot be fetched.
    pub async fn initialize(&self, feed: &dyn MarketData) -> Result<(), BookError> {
        let (bids, asks) = tokio::try_join!(
            feed.fetch_side(&self.market, Side::Bid),
            feed.fetch_side(&self.market, Side::Ask),
        )
        .map_err(|source| BookError::Load {
            market: self.market.clone(),
            source,
        })?;

        *self.bids.write() = Some(bids);
        *self.asks.write() = Some(asks);

        debug!("[BookCache {}] initial snapshot loaded", self.market);
        Ok(())
    }

    /// Register for change notifications on both sides and spawn one
    /// writer task per side. Each task is the sole writer for its slot.
    pub async fn subscribe(&self, feed: &dyn MarketData) -> Result<(), BookError> {
        let bid_rx = feed
            .subscribe(&self.market, Side::Bid)
            .await
            .map_err(|source| BookError::Load {
                market: self.market.clone(),
                source,
            })?;
        let ask_rx = feed
            .subscribe(&self.market, Side::Ask)
            .await
            .map_err(|source| BookError::Load {
                market: self.market.clone(),
                source,
            })?;

        spawn_side_writer(self.market.clone(), Side::Bid, Arc::clone(&self.bids), bid_rx);
        spawn_side_writer(self.market.clone(), Side::Ask, Arc::clone(&self.asks), ask_rx);

        Ok(())
    }

    /// Best bid and ask prices as of the last fully-applied notification
    /// for each side independently (see the module note on cross-side
    /// consistency). `NotReady` until both sides have a best level.
    pub fn top_of_book(&self) -> Result<(f64, f64), BookError> {
        let bid = self.bids.read().as_ref().and_then(BookSide::best);
        let ask = self.asks.read().as_ref().and_then(BookSide::best);

        match (bid, ask) {
            (Some(bid), Some(ask)) => Ok((bid.price, ask.price)),
            _ => Err(BookError::NotReady(self.market.clone())),
        }
    }

    /// Full-depth copy of both sides, for viewers and logging.
    pub fn depth(&self) -> (Option<BookSide>, Option<BookSide>) {
        (self.bids.read().clone(), self.asks.read().clone())
    }

    /// One-line summary for logging.
    pub fn format_summary(&self) -> String {
        let fmt = |slot: &SideSlot| {
            slot.read()
                .as_ref()
                .and_then(BookSide::best)
                .map(|l| format!("{:.4} ({:.2})", l.price, l.size))
                .unwrap_or_else(|| "N/A".to_string())
        };
        format!("Bid: {} | Ask: {}", fmt(&self.bids), fmt(&self.asks))
    }
}

/// Consume one side's notification stream, replacing that side's whole
/// snapshot per notification. Notifications are applied in delivery
/// order; the cache does not deduplicate or reorder them.
fn spawn_side_writer(
    market: String,
    side: Side,
    slot: SideSlot,
    mut rx: mpsc::UnboundedReceiver<BookSide>,
) {
    tokio::spawn(async move {
        while let Some(book) = rx.recv().await {
            *slot.write() = Some(book);
        }
        debug!("[BookCache {}] {} notification stream closed", market, side);
    });
}
