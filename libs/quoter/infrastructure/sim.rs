//! In-memory venue for paper trading and tests.
//!
//! Implements both collaborator traits over a shared map of markets.
//! Book sides are set directly by the driver (`set_side`), which also
//! fans the replacement snapshot out to subscribers, mimicking the
//! venue's per-side push notifications. Submitted batches are recorded
//! so tests can assert on exactly what went over the wire.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use super::venue::{BatchConfirmation, MarketData, OrderGateway, VenueError};
use crate::domain::{BookSide, Operation, PriceLevel, RestingOrder, Side};

const SIM_OWNER: &str = "paper";

#[derive(Default)]
struct SimMarket {
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    open_orders: Vec<RestingOrder>,
    bid_subscribers: Vec<mpsc::UnboundedSender<BookSide>>,
    ask_subscribers: Vec<mpsc::UnboundedSender<BookSide>>,
    submitted: Vec<Vec<Operation>>,
    settles: u64,
    fail_next_submit: bool,
}

struct SimState {
    markets: HashMap<String, SimMarket>,
    next_order_id: u64,
    next_batch_id: u64,
}

/// Simulated venue shared by the paper-trading binary and the tests.
#[derive(Clone)]
pub struct SimVenue {
    state: Arc<Mutex<SimState>>,
}

impl SimVenue {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                markets: HashMap::new(),
                next_order_id: 1,
                next_batch_id: 1,
            })),
        }
    }

    /// Create a market with an initial book.
    pub fn seed_market(&self, market: &str, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) {
        let mut state = self.state.lock();
        let entry = state.markets.entry(market.to_string()).or_default();
        entry.bids = bids;
        entry.asks = asks;
    }

    /// Replace one side of the book and push the new snapshot to every
    /// subscriber of that side.
    pub fn set_side(&self, market: &str, side: Side, levels: Vec<PriceLevel>) {
        let mut state = self.state.lock();
        let Some(entry) = state.markets.get_mut(market) else {
            return;
        };

        match side {
            Side::Bid => entry.bids = levels.clone(),
            Side::Ask => entry.asks = levels.clone(),
        }

        let subscribers = match side {
            Side::Bid => &mut entry.bid_subscribers,
            Side::Ask => &mut entry.ask_subscribers,
        };
        subscribers.retain(|tx| tx.send(BookSide::from_levels(side, levels.clone())).is_ok());
    }

    /// The next `submit_batch` call fails with `VenueError::Submit`.
    pub fn fail_next_submit(&self, market: &str) {
        if let Some(entry) = self.state.lock().markets.get_mut(market) {
            entry.fail_next_submit = true;
        }
    }

    /// Batches confirmed so far for this market, in submission order.
    pub fn submitted_batches(&self, market: &str) -> Vec<Vec<Operation>> {
        self.state
            .lock()
            .markets
            .get(market)
            .map(|m| m.submitted.clone())
            .unwrap_or_default()
    }

    /// Number of settle operations confirmed for this market.
    pub fn settle_count(&self, market: &str) -> u64 {
        self.state
            .lock()
            .markets
            .get(market)
            .map(|m| m.settles)
            .unwrap_or(0)
    }

    /// Current resting orders, as the gateway would report them.
    pub fn resting_orders(&self, market: &str) -> Vec<RestingOrder> {
        self.state
            .lock()
            .markets
            .get(market)
            .map(|m| m.open_orders.clone())
            .unwrap_or_default()
    }
}

impl Default for SimVenue {
    fn default() -> Self {
        Self::new()
    }
}

fn op_market(op: &Operation) -> &str {
    match op {
        Operation::PlaceOrder { market, .. }
        | Operation::CancelOrder { market, .. }
        | Operation::SettleFunds { market } => market,
    }
}

#[async_trait]
impl MarketData for SimVenue {
    async fn fetch_side(&self, market: &str, side: Side) -> Result<BookSide, VenueError> {
        let state = self.state.lock();
        let entry = state
            .markets
            .get(market)
            .ok_or_else(|| VenueError::UnknownMarket(market.to_string()))?;

        let levels = match side {
            Side::Bid => entry.bids.clone(),
            Side::Ask => entry.asks.clone(),
        };
        Ok(BookSide::from_levels(side, levels))
    }

    async fn subscribe(
        &self,
        market: &str,
        side: Side,
    ) -> Result<mpsc::UnboundedReceiver<BookSide>, VenueError> {
        let mut state = self.state.lock();
        let entry = state
            .markets
            .get_mut(market)
            .ok_or_else(|| VenueError::UnknownMarket(market.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        match side {
            Side::Bid => entry.bid_subscribers.push(tx),
            Side::Ask => entry.ask_subscribers.push(tx),
        }
        Ok(rx)
    }
}

#[async_trait]
impl OrderGateway for SimVenue {
    async fn open_orders(&self, market: &str) -> Result<Vec<RestingOrder>, VenueError> {
        let state = self.state.lock();
        let entry = state
            .markets
            .get(market)
            .ok_or_else(|| VenueError::UnknownMarket(market.to_string()))?;
        Ok(entry.open_orders.clone())
    }

    async fn submit_batch(&self, ops: Vec<Operation>) -> Result<BatchConfirmation, VenueError> {
        let mut state = self.state.lock();

        // Injected failures and validation happen before any mutation:
        // the batch is all-or-nothing.
        for op in &ops {
            let market = op_market(op);
            let entry = state
                .markets
                .get_mut(market)
                .ok_or_else(|| VenueError::UnknownMarket(market.to_string()))?;
            if entry.fail_next_submit {
                entry.fail_next_submit = false;
                return Err(VenueError::Submit("injected submit failure".to_string()));
            }
        }
        for op in &ops {
            if let Operation::CancelOrder { market, order_id } = op {
                let entry = state.markets.get(market).unwrap();
                if !entry.open_orders.iter().any(|o| &o.order_id == order_id) {
                    return Err(VenueError::Submit(format!("unknown order: {}", order_id)));
                }
            }
        }

        let op_count = ops.len();
        let mut recorded: HashMap<String, Vec<Operation>> = HashMap::new();

        for op in ops {
            let market = op_market(&op).to_string();
            match &op {
                Operation::CancelOrder { order_id, .. } => {
                    let entry = state.markets.get_mut(&market).unwrap();
                    entry.open_orders.retain(|o| &o.order_id != order_id);
                }
                Operation::PlaceOrder {
                    side, price, size, ..
                } => {
                    let order_id = format!("sim-{}", state.next_order_id);
                    state.next_order_id += 1;
                    let entry = state.markets.get_mut(&market).unwrap();
                    entry
                        .open_orders
                        .push(RestingOrder::new(order_id, *side, *price, *size, SIM_OWNER));
                }
                Operation::SettleFunds { .. } => {
                    state.markets.get_mut(&market).unwrap().settles += 1;
                }
            }
            recorded.entry(market).or_default().push(op);
        }

        for (market, batch) in recorded {
            if let Some(entry) = state.markets.get_mut(&market) {
                entry.submitted.push(batch);
            }
        }

        let batch_id = format!("batch-{}", state.next_batch_id);
        state.next_batch_id += 1;
        debug!("[SimVenue] confirmed {} ({} ops)", batch_id, op_count);

        Ok(BatchConfirmation {
            batch_id,
            operations: op_count,
        })
    }
}
