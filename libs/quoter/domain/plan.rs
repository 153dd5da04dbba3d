//! Reconciliation plan: diff the desired quote against live resting orders.
//!
//! # Algorithm (per side, independently)
//! 1. Aggregate the side's resting orders into (best price, total size).
//! 2. If the resting price sits inside the reinforcement band of the
//!    target price, keep the resting orders and top up the size only
//!    when the shortfall exceeds the minimum increment. No cancellation
//!    is issued for that side, preserving queue priority.
//! 3. Otherwise cancel every resting order on the side and place exactly
//!    one fresh order at the target price/size.
//!
//! The reinforcement band is the target price plus up to N ticks deeper
//! into the book (below for bids, above for asks): after a pass places a
//! bid one tick above the market, the next pass's target is one tick
//! above our own order, so a band of one tick keeps the controller from
//! front-running itself.

use super::order::{NewOrder, RestingOrder, Side};
use super::quote::DesiredQuote;

/// Tolerance for comparing venue prices that went through float decode.
const PRICE_EPS: f64 = 1e-9;

/// Diff parameters, sourced from configuration.
#[derive(Debug, Clone, Copy)]
pub struct PlanParams {
    pub tick_size: f64,
    /// Width of the reinforcement band, in ticks.
    pub reinforce_tolerance_ticks: f64,
    /// Minimum size shortfall worth topping up.
    pub min_increment: f64,
}

/// A single typed operation for the venue batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    PlaceOrder {
        market: String,
        side: Side,
        price: f64,
        size: f64,
    },
    CancelOrder {
        market: String,
        order_id: String,
    },
    SettleFunds {
        market: String,
    },
}

/// The corrective actions one reconciliation pass wants executed.
///
/// Ephemeral: built from a fresh venue fetch each pass and consumed
/// immediately. The settle operation is implied and always appended by
/// `into_operations`.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    pub cancellations: Vec<RestingOrder>,
    pub placements: Vec<NewOrder>,
}

impl ReconciliationPlan {
    /// Diff the desired quote against the venue's view of our orders.
    pub fn build(desired: &DesiredQuote, resting: &[RestingOrder], params: &PlanParams) -> Self {
        let mut plan = Self::default();

        let (bid_cancels, bid_place) = diff_side(
            Side::Bid,
            desired.bid_price,
            desired.bid_size,
            resting,
            params,
        );
        let (ask_cancels, ask_place) = diff_side(
            Side::Ask,
            desired.ask_price,
            desired.ask_size,
            resting,
            params,
        );

        plan.cancellations.extend(bid_cancels);
        plan.cancellations.extend(ask_cancels);
        plan.placements.extend(bid_place);
        plan.placements.extend(ask_place);
        plan
    }

    /// A plan with nothing beyond the mandatory settle is a no-op: the
    /// pass is reported as skipped and never submitted.
    pub fn is_noop(&self) -> bool {
        self.cancellations.is_empty() && self.placements.is_empty()
    }

    /// Sequence the batch: cancellations before placements so the same
    /// side is never transiently double-quoted, settle last.
    pub fn into_operations(self, market: &str) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(self.cancellations.len() + self.placements.len() + 1);

        for order in self.cancellations {
            ops.push(Operation::CancelOrder {
                market: market.to_string(),
                order_id: order.order_id,
            });
        }
        for order in self.placements {
            ops.push(Operation::PlaceOrder {
                market: market.to_string(),
                side: order.side,
                price: order.price,
                size: order.size,
            });
        }
        ops.push(Operation::SettleFunds {
            market: market.to_string(),
        });

        ops
    }
}

/// Diff one side of the quote against the resting orders on that side.
///
/// Returns (orders to cancel, order to place).
fn diff_side(
    side: Side,
    target_price: f64,
    target_size: f64,
    resting: &[RestingOrder],
    params: &PlanParams,
) -> (Vec<RestingOrder>, Option<NewOrder>) {
    let ours: Vec<&RestingOrder> = resting.iter().filter(|o| o.side == side).collect();

    if ours.is_empty() {
        return (Vec::new(), Some(NewOrder::new(side, target_price, target_size)));
    }

    // Aggregate view of what we have resting on this side: best price,
    // total size across all of our orders.
    let resting_price = match side {
        Side::Bid => ours
            .iter()
            .map(|o| o.price)
            .fold(f64::NEG_INFINITY, f64::max),
        Side::Ask => ours.iter().map(|o| o.price).fold(f64::INFINITY, f64::min),
    };
    let resting_size: f64 = ours.iter().map(|o| o.size).sum();

    let band = params.tick_size * params.reinforce_tolerance_ticks;
    let in_band = match side {
        // Resting bid may equal the target or sit up to `band` below it.
        Side::Bid => {
            resting_price <= target_price + PRICE_EPS
                && resting_price + band + PRICE_EPS >= target_price
        }
        // Resting ask may equal the target or sit up to `band` above it.
        Side::Ask => {
            resting_price + PRICE_EPS >= target_price
                && resting_price <= target_price + band + PRICE_EPS
        }
    };

    if in_band {
        // Keep the resting price (and its queue priority); top up the
        // size only when the shortfall is worth the fee.
        let shortfall = target_size - resting_size;
        if shortfall > params.min_increment {
            (Vec::new(), Some(NewOrder::new(side, resting_price, shortfall)))
        } else {
            (Vec::new(), None)
        }
    } else {
        let cancels = ours.into_iter().cloned().collect();
        (cancels, Some(NewOrder::new(side, target_price, target_size)))
    }
}
