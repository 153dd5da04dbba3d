//! Venue collaborator contracts.
//!
//! The wire protocol, account encoding and signing all live behind these
//! two traits; the core only ever sees decoded domain types. Side change
//! notifications arrive as two logically separate streams (one per
//! side), each delivering a complete replacement `BookSide`.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::{BookSide, Operation, RestingOrder, Side};

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("failed to fetch {side} side of {market}: {reason}")]
    FetchSide {
        market: String,
        side: Side,
        reason: String,
    },

    #[error("failed to subscribe to {side} side of {market}: {reason}")]
    Subscribe {
        market: String,
        side: Side,
        reason: String,
    },

    #[error("failed to fetch open orders for {market}: {reason}")]
    FetchOrders { market: String, reason: String },

    #[error("batch submission failed: {0}")]
    Submit(String),

    #[error("unknown market: {0}")]
    UnknownMarket(String),
}

/// Receipt for a confirmed batch.
#[derive(Debug, Clone)]
pub struct BatchConfirmation {
    pub batch_id: String,
    pub operations: usize,
}

/// Read access to a market's order book.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// One-shot full fetch of one side.
    async fn fetch_side(&self, market: &str, side: Side) -> Result<BookSide, VenueError>;

    /// Push subscription for one side. Every received `BookSide` is a
    /// complete replacement snapshot in venue-delivery order.
    async fn subscribe(
        &self,
        market: &str,
        side: Side,
    ) -> Result<mpsc::UnboundedReceiver<BookSide>, VenueError>;
}

/// Order query and execution access for the agent's account.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Authoritative list of the agent's resting orders on this market.
    async fn open_orders(&self, market: &str) -> Result<Vec<RestingOrder>, VenueError>;

    /// Submit one all-or-nothing batch and block until the venue reports
    /// finality or failure.
    async fn submit_batch(&self, ops: Vec<Operation>) -> Result<BatchConfirmation, VenueError>;
}
