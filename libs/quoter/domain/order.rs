//! Order types shared by the book cache and the reconciliation controller.

use serde::{Deserialize, Serialize};

/// Side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// An order the agent currently has resting on the venue.
///
/// The venue is the source of truth for these: the controller re-fetches
/// the full list at the start of every reconciliation pass and never
/// trusts a local copy across passes.
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    pub order_id: String,
    pub side: Side,
    pub price: f64,
    pub size: f64,
    /// Owning-account identity on the venue.
    pub owner: String,
}

impl RestingOrder {
    pub fn new(
        order_id: impl Into<String>,
        side: Side,
        price: f64,
        size: f64,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            side,
            price,
            size,
            owner: owner.into(),
        }
    }
}

/// A new order the controller wants placed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub side: Side,
    pub price: f64,
    pub size: f64,
}

impl NewOrder {
    pub fn new(side: Side, price: f64, size: f64) -> Self {
        Self { side, price, size }
    }

    pub fn bid(price: f64, size: f64) -> Self {
        Self::new(Side::Bid, price, size)
    }

    pub fn ask(price: f64, size: f64) -> Self {
        Self::new(Side::Ask, price, size)
    }
}
