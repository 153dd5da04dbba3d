//! Top-of-book quoting strategy.
//!
//! Keeps one bid and one ask resting just inside the current top of
//! book. Each tick runs a full reconciliation pass: read the cached
//! top, derive the desired quote, fetch our resting orders from the
//! venue, diff, and submit one atomic batch of corrections. The venue
//! is the source of truth for resting orders; nothing about past
//! passes is carried between ticks.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{DesiredQuote, ReconciliationPlan, FALLBACK_TOP};
use crate::infrastructure::book_cache::{BookCache, BookError};
use crate::infrastructure::config::QuoterConfig;
use crate::infrastructure::venue::{BatchConfirmation, VenueError};

use super::strategy::{Strategy, StrategyContext, StrategyResult};

/// What one reconciliation pass did.
#[derive(Debug)]
pub enum PassOutcome {
    /// A corrective batch was confirmed by the venue.
    Submitted(BatchConfirmation),
    /// The plan was settle-only; nothing was submitted.
    Skipped,
}

pub struct TopOfBookStrategy {
    config: QuoterConfig,
    cache: BookCache,
}

impl TopOfBookStrategy {
    pub fn new(config: QuoterConfig) -> Self {
        let cache = BookCache::new(config.market.clone());
        Self { config, cache }
    }

    pub fn config(&self) -> &QuoterConfig {
        &self.config
    }

    /// Load the initial book snapshot and start the side writer tasks.
    ///
    /// A failed initial load is fatal: better to not start than to
    /// quote the fallback spread forever against a dead feed.
    pub async fn warm_up(&self, ctx: &StrategyContext) -> Result<(), BookError> {
        self.cache.initialize(ctx.market_data.as_ref()).await?;
        self.cache.subscribe(ctx.market_data.as_ref()).await
    }

    /// One reconciliation pass against the venue's current state.
    ///
    /// Errors here are per-pass: the caller logs them and runs the next
    /// pass on schedule. A failed pass leaves no partial state behind,
    /// since the batch is all-or-nothing and the next pass re-fetches
    /// resting orders from the venue anyway.
    pub async fn reconcile_once(&self, ctx: &StrategyContext) -> Result<PassOutcome, VenueError> {
        let top = match self.cache.top_of_book() {
            Ok(top) => top,
            Err(err) => {
                warn!(
                    "[TopOfBook {}] {}; quoting fallback spread",
                    self.config.market, err
                );
                FALLBACK_TOP
            }
        };

        let desired = DesiredQuote::from_top(
            top.0,
            top.1,
            self.config.offset(),
            self.config.order_size,
        );

        let resting = ctx.gateway.open_orders(&self.config.market).await?;
        let plan = ReconciliationPlan::build(&desired, &resting, &self.config.plan_params());

        if plan.is_noop() {
            return Ok(PassOutcome::Skipped);
        }

        let ops = plan.into_operations(&self.config.market);
        let confirmation = ctx.gateway.submit_batch(ops).await?;
        Ok(PassOutcome::Submitted(confirmation))
    }
}

#[async_trait]
impl Strategy for TopOfBookStrategy {
    fn name(&self) -> &str {
        "top_of_book"
    }

    fn description(&self) -> &str {
        "Maintains a two-sided quote one offset inside the top of book"
    }

    async fn start(&mut self, ctx: &StrategyContext) -> StrategyResult<()> {
        self.warm_up(ctx).await?;

        info!(
            "[TopOfBook {}] started: {}",
            self.config.market,
            self.cache.format_summary()
        );

        let interval = Duration::from_millis(self.config.requote_interval_ms);

        while ctx.is_running() {
            let tick_start = Instant::now();

            match self.reconcile_once(ctx).await {
                Ok(PassOutcome::Submitted(confirmation)) => {
                    info!(
                        "[TopOfBook {}] batch {} confirmed ({} ops) | {}",
                        self.config.market,
                        confirmation.batch_id,
                        confirmation.operations,
                        self.cache.format_summary()
                    );
                }
                Ok(PassOutcome::Skipped) => {
                    debug!(
                        "[TopOfBook {}] quote already in place, pass skipped",
                        self.config.market
                    );
                }
                Err(err) => {
                    warn!(
                        "[TopOfBook {}] pass failed: {}; retrying next tick",
                        self.config.market, err
                    );
                }
            }

            let remaining = interval.saturating_sub(tick_start.elapsed());
            ctx.shutdown.interruptible_sleep(remaining).await;
        }

        info!("[TopOfBook {}] stopped", self.config.market);
        Ok(())
    }
}
