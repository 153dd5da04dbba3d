//! Desired quote computation.
//!
//! The target quote sits one offset inside the observed top of book so a
//! fill requires the market to come to us rather than matching our own
//! resting orders. When the offset would cross the quote (bid >= ask),
//! both prices shrink symmetrically around the mid so the pair never
//! crosses.

use tracing::debug;

/// Top-of-book substituted when the cache is not ready yet.
///
/// Deliberately absurd (bid 1, ask 1,000,000): the resulting quote is so
/// wide it cannot be hit before real book data arrives.
pub const FALLBACK_TOP: (f64, f64) = (1.0, 1_000_000.0);

/// The quote the controller wants resting on the venue, recomputed from
/// scratch every reconciliation pass and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredQuote {
    pub bid_price: f64,
    pub bid_size: f64,
    pub ask_price: f64,
    pub ask_size: f64,
}

impl DesiredQuote {
    /// Derive the target quote from top of book.
    ///
    /// bid = top_bid + offset, ask = top_ask - offset. If that crosses,
    /// both prices are pulled back to mid -/+ offset/2, which keeps
    /// bid < ask strictly for any input (offset must be positive).
    pub fn from_top(top_bid: f64, top_ask: f64, offset: f64, size: f64) -> Self {
        let mut bid = top_bid + offset;
        let mut ask = top_ask - offset;

        if bid >= ask {
            let mid = (bid + ask) / 2.0;
            bid = mid - offset / 2.0;
            ask = mid + offset / 2.0;
            debug!(
                "[Quote] offset crossed the quote, shrunk around mid {:.4} to {:.4}/{:.4}",
                mid, bid, ask
            );
        }

        Self {
            bid_price: bid,
            bid_size: size,
            ask_price: ask,
            ask_size: size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_uncrossed_quote_uses_plain_offset() {
        let q = DesiredQuote::from_top(0.50, 0.56, 0.01, 100.0);
        assert!((q.bid_price - 0.51).abs() < TEST_TOLERANCE);
        assert!((q.ask_price - 0.55).abs() < TEST_TOLERANCE);
        assert!((q.bid_size - 100.0).abs() < TEST_TOLERANCE);
        assert!((q.ask_size - 100.0).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_tight_spread_shrinks_around_mid() {
        // top (100.00, 100.02) with a 0.01 offset meets in the middle:
        // bid = ask = 100.01, so both shrink to mid -/+ offset/2.
        let q = DesiredQuote::from_top(100.00, 100.02, 0.01, 100.0);
        assert!((q.bid_price - 100.005).abs() < TEST_TOLERANCE);
        assert!((q.ask_price - 100.015).abs() < TEST_TOLERANCE);
        assert!(q.bid_price < q.ask_price);
    }

    #[test]
    fn test_inverted_top_still_produces_valid_quote() {
        // A transiently crossed book (stale side pairing) must still
        // yield bid < ask.
        let q = DesiredQuote::from_top(100.05, 100.00, 0.01, 50.0);
        assert!(q.bid_price < q.ask_price);
        assert!((q.ask_price - q.bid_price - 0.01).abs() < TEST_TOLERANCE);
    }

    #[test]
    fn test_fallback_top_never_crosses() {
        let (bid, ask) = FALLBACK_TOP;
        let q = DesiredQuote::from_top(bid, ask, 0.01, 100.0);
        assert!(q.bid_price < q.ask_price);
        assert!((q.bid_price - 1.01).abs() < TEST_TOLERANCE);
        assert!((q.ask_price - 999_999.99).abs() < TEST_TOLERANCE);
    }
}
