//! End-to-end reconciliation passes against the simulated venue.
//!
//! Drives `TopOfBookStrategy::reconcile_once` directly so each pass is
//! deterministic; the tick loop only adds scheduling on top of this.

use std::sync::Arc;

use quoter::application::{PassOutcome, StrategyContext, TopOfBookStrategy};
use quoter::domain::{Operation, PriceLevel, Side};
use quoter::infrastructure::{OrderGateway, QuoterConfig, SimVenue};
use quoter::utils::ShutdownManager;

const MARKET: &str = "SOL/USDC";
const TEST_TOLERANCE: f64 = 1e-9;

fn level(price: f64, size: f64) -> PriceLevel {
    PriceLevel::new(price, size)
}

fn context(venue: &SimVenue) -> StrategyContext {
    StrategyContext::new(
        Arc::new(ShutdownManager::new()),
        Arc::new(venue.clone()),
        Arc::new(venue.clone()),
    )
}

fn seeded_venue() -> SimVenue {
    let venue = SimVenue::new();
    venue.seed_market(
        MARKET,
        vec![level(99.98, 10.0), level(99.95, 40.0)],
        vec![level(100.03, 12.0), level(100.06, 30.0)],
    );
    venue
}

async fn warmed_strategy(ctx: &StrategyContext) -> TopOfBookStrategy {
    let strategy = TopOfBookStrategy::new(QuoterConfig::default());
    strategy.warm_up(ctx).await.unwrap();
    strategy
}

#[tokio::test]
async fn first_pass_places_both_sides_then_settles() {
    let venue = seeded_venue();
    let ctx = context(&venue);
    let strategy = warmed_strategy(&ctx).await;

    let outcome = strategy.reconcile_once(&ctx).await.unwrap();
    assert!(matches!(outcome, PassOutcome::Submitted(_)));

    let batches = venue.submitted_batches(MARKET);
    assert_eq!(batches.len(), 1);
    let ops = &batches[0];

    // No resting orders yet: two placements and the settle, in order.
    assert_eq!(ops.len(), 3);
    assert!(matches!(ops[0], Operation::PlaceOrder { .. }));
    assert!(matches!(ops[1], Operation::PlaceOrder { .. }));
    assert!(matches!(ops[2], Operation::SettleFunds { .. }));

    // One tick (0.01) inside the top of book (99.98 / 100.03).
    let resting = venue.resting_orders(MARKET);
    let bid = resting.iter().find(|o| o.side == Side::Bid).unwrap();
    let ask = resting.iter().find(|o| o.side == Side::Ask).unwrap();
    assert!((bid.price - 99.99).abs() < TEST_TOLERANCE);
    assert!((ask.price - 100.02).abs() < TEST_TOLERANCE);
}

#[tokio::test]
async fn steady_state_passes_are_skipped() {
    let venue = seeded_venue();
    let ctx = context(&venue);
    let strategy = warmed_strategy(&ctx).await;

    assert!(matches!(
        strategy.reconcile_once(&ctx).await.unwrap(),
        PassOutcome::Submitted(_)
    ));
    for _ in 0..3 {
        assert!(matches!(
            strategy.reconcile_once(&ctx).await.unwrap(),
            PassOutcome::Skipped
        ));
    }

    // Only the first pass went over the wire, with exactly one settle.
    assert_eq!(venue.submitted_batches(MARKET).len(), 1);
    assert_eq!(venue.settle_count(MARKET), 1);
}

#[tokio::test]
async fn book_move_cancels_and_requotes() {
    let venue = seeded_venue();
    let ctx = context(&venue);
    let strategy = warmed_strategy(&ctx).await;

    strategy.reconcile_once(&ctx).await.unwrap();
    assert_eq!(venue.resting_orders(MARKET).len(), 2);

    // The market jumps well past the tolerance band on both sides.
    venue.set_side(MARKET, Side::Bid, vec![level(101.50, 10.0)]);
    venue.set_side(MARKET, Side::Ask, vec![level(101.60, 10.0)]);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let outcome = strategy.reconcile_once(&ctx).await.unwrap();
    assert!(matches!(outcome, PassOutcome::Submitted(_)));

    let batches = venue.submitted_batches(MARKET);
    let ops = &batches[1];
    let cancels = ops
        .iter()
        .filter(|op| matches!(op, Operation::CancelOrder { .. }))
        .count();
    let places = ops
        .iter()
        .filter(|op| matches!(op, Operation::PlaceOrder { .. }))
        .count();
    assert_eq!(cancels, 2);
    assert_eq!(places, 2);

    let resting = venue.resting_orders(MARKET);
    assert_eq!(resting.len(), 2);
    let bid = resting.iter().find(|o| o.side == Side::Bid).unwrap();
    let ask = resting.iter().find(|o| o.side == Side::Ask).unwrap();
    assert!((bid.price - 101.51).abs() < TEST_TOLERANCE);
    assert!((ask.price - 101.59).abs() < TEST_TOLERANCE);
}

#[tokio::test]
async fn partial_fill_is_topped_up_without_cancelling() {
    let venue = seeded_venue();
    let ctx = context(&venue);
    let strategy = warmed_strategy(&ctx).await;

    strategy.reconcile_once(&ctx).await.unwrap();
    let bid_id = venue
        .resting_orders(MARKET)
        .into_iter()
        .find(|o| o.side == Side::Bid)
        .unwrap()
        .order_id;

    // Simulate a partial fill by shrinking the resting bid: cancel and
    // re-place it smaller at the same price, as the venue would report
    // after a 40-unit fill.
    venue
        .submit_batch(vec![
            Operation::CancelOrder {
                market: MARKET.to_string(),
                order_id: bid_id,
            },
            Operation::PlaceOrder {
                market: MARKET.to_string(),
                side: Side::Bid,
                price: 99.99,
                size: 60.0,
            },
        ])
        .await
        .unwrap();

    let outcome = strategy.reconcile_once(&ctx).await.unwrap();
    assert!(matches!(outcome, PassOutcome::Submitted(_)));

    let batches = venue.submitted_batches(MARKET);
    let ops = batches.last().unwrap();
    assert!(
        ops.iter()
            .all(|op| !matches!(op, Operation::CancelOrder { .. })),
        "top-up pass must not cancel"
    );

    let resting = venue.resting_orders(MARKET);
    let bid_total: f64 = resting
        .iter()
        .filter(|o| o.side == Side::Bid)
        .map(|o| o.size)
        .sum();
    assert!((bid_total - 100.0).abs() < TEST_TOLERANCE);
}

#[tokio::test]
async fn submit_failure_recovers_on_next_pass() {
    let venue = seeded_venue();
    let ctx = context(&venue);
    let strategy = warmed_strategy(&ctx).await;

    venue.fail_next_submit(MARKET);
    assert!(strategy.reconcile_once(&ctx).await.is_err());
    assert!(venue.resting_orders(MARKET).is_empty());

    // The next pass re-fetches resting orders and retries from scratch.
    let outcome = strategy.reconcile_once(&ctx).await.unwrap();
    assert!(matches!(outcome, PassOutcome::Submitted(_)));
    assert_eq!(venue.resting_orders(MARKET).len(), 2);
}

#[tokio::test]
async fn not_ready_cache_quotes_the_fallback_spread() {
    let venue = seeded_venue();
    let ctx = context(&venue);

    // Skip warm-up: the cache has no data, so the pass falls back to
    // the deliberately-unhittable wide quote instead of failing.
    let strategy = TopOfBookStrategy::new(QuoterConfig::default());
    let outcome = strategy.reconcile_once(&ctx).await.unwrap();
    assert!(matches!(outcome, PassOutcome::Submitted(_)));

    let resting = venue.resting_orders(MARKET);
    let bid = resting.iter().find(|o| o.side == Side::Bid).unwrap();
    let ask = resting.iter().find(|o| o.side == Side::Ask).unwrap();
    assert!((bid.price - 1.01).abs() < TEST_TOLERANCE);
    assert!((ask.price - 999_999.99).abs() < TEST_TOLERANCE);
}

#[tokio::test]
async fn unknown_market_surfaces_as_pass_error() {
    let venue = SimVenue::new();
    let ctx = context(&venue);
    let strategy = TopOfBookStrategy::new(QuoterConfig::default());

    // Nothing seeded: open_orders fails, the pass errors, nothing is
    // submitted.
    assert!(strategy.reconcile_once(&ctx).await.is_err());
}
