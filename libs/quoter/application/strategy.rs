//! Strategy trait definition
//!
//! Defines the contract that all quoting strategies must implement.

use crate::infrastructure::book_cache::BookError;
use crate::infrastructure::venue::{MarketData, OrderGateway};
use crate::utils::ShutdownManager;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for strategy operations
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Errors that can occur in strategy execution
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Order book error: {0}")]
    Book(#[from] BookError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy interrupted by shutdown")]
    Shutdown,

    #[error("Strategy error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Context provided to all strategies
pub struct StrategyContext {
    /// Shutdown manager for interruptible operations
    pub shutdown: Arc<ShutdownManager>,
    /// Read access to venue order books
    pub market_data: Arc<dyn MarketData>,
    /// Order query and batch submission
    pub gateway: Arc<dyn OrderGateway>,
}

impl StrategyContext {
    pub fn new(
        shutdown: Arc<ShutdownManager>,
        market_data: Arc<dyn MarketData>,
        gateway: Arc<dyn OrderGateway>,
    ) -> Self {
        Self {
            shutdown,
            market_data,
            gateway,
        }
    }

    /// Check if the strategy should continue running
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }
}

/// Trait that all quoting strategies must implement
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Get the strategy name for logging and identification
    fn name(&self) -> &str;

    /// Get a description of what this strategy does
    fn description(&self) -> &str;

    /// Start the strategy execution
    ///
    /// This method should run the main strategy loop until:
    /// - The shutdown flag is set to false
    /// - An unrecoverable error occurs
    ///
    /// The strategy should check `ctx.is_running()` regularly and
    /// use `ctx.shutdown.interruptible_sleep()` for delays.
    async fn start(&mut self, ctx: &StrategyContext) -> StrategyResult<()>;

    /// Stop the strategy gracefully
    ///
    /// The default implementation does nothing (relies on shutdown flag).
    async fn stop(&mut self) -> StrategyResult<()> {
        Ok(())
    }
}
