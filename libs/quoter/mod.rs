//! Automated quoting agent for a single order-book market.
//!
//! The crate is split along the usual lines:
//! - `domain`: pure types and the reconciliation diff, no I/O
//! - `application`: the strategy contract and the quoting controller
//! - `infrastructure`: venue traits, the book cache, config, logging
//! - `utils`: shutdown plumbing shared by the binaries

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use application::{PassOutcome, Strategy, StrategyContext, StrategyError, TopOfBookStrategy};
pub use domain::{
    BookSide, DesiredQuote, NewOrder, Operation, PlanParams, PriceLevel, ReconciliationPlan,
    RestingOrder, Side, FALLBACK_TOP,
};
pub use infrastructure::{
    BatchConfirmation, BookCache, BookError, MarketData, OrderGateway, QuoterConfig, SimVenue,
    VenueError,
};
pub use utils::ShutdownManager;
