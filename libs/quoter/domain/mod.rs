//! Domain types: order book sides, orders, quotes, reconciliation plans.

pub mod order;
pub mod orderbook;
pub mod plan;
pub mod quote;

pub use order::{NewOrder, RestingOrder, Side};
pub use orderbook::{BookSide, PriceLevel};
pub use plan::{Operation, PlanParams, ReconciliationPlan};
pub use quote::{DesiredQuote, FALLBACK_TOP};
