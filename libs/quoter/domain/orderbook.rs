//! Order book domain entities.
//!
//! A `BookSide` is always a complete, self-consistent side: the cache
//! replaces it wholesale on every venue notification, never patches it
//! in place.

use serde::{Deserialize, Serialize};

use super::order::Side;

/// Price level in an order book: (price, aggregate size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub size: f64,
}

impl PriceLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

/// One side of the order book (bids or asks).
///
/// Bids are ordered best-to-worst descending by price, asks ascending.
#[derive(Debug, Clone)]
pub struct BookSide {
    levels: Vec<PriceLevel>,
    side: Side,
}

impl BookSide {
    /// Create an empty side.
    pub fn new(side: Side) -> Self {
        Self {
            levels: Vec::new(),
            side,
        }
    }

    /// Build a side from decoded venue levels, dropping empty levels and
    /// sorting by price (descending for bids, ascending for asks).
    pub fn from_levels(side: Side, levels: Vec<PriceLevel>) -> Self {
        let mut levels: Vec<PriceLevel> = levels.into_iter().filter(|l| l.size > 0.0).collect();

        match side {
            Side::Bid => {
                levels.sort_unstable_by(|a, b| b.price.partial_cmp(&a.price).unwrap());
            }
            Side::Ask => {
                levels.sort_unstable_by(|a, b| a.price.partial_cmp(&b.price).unwrap());
            }
        }

        Self { levels, side }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Best level: highest bid or lowest ask.
    #[inline]
    pub fn best(&self) -> Option<PriceLevel> {
        self.levels.first().copied()
    }

    #[inline]
    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Sum of all level sizes.
    pub fn total_size(&self) -> f64 {
        self.levels.iter().map(|l| l.size).sum()
    }

    /// Format the top N levels for logging.
    pub fn format_depth(&self, max_levels: usize) -> String {
        if self.levels.is_empty() {
            return "(empty)".to_string();
        }
        self.levels
            .iter()
            .take(max_levels)
            .map(|l| format!("{:.4}({:.2})", l.price, l.size))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
