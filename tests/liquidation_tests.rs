//! Liquidation monitor against scripted prices.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signalkeeper::app::config::LiquidationConfig;
use signalkeeper::app::{AppState, LiquidationMonitor};
use signalkeeper::domain::{PositionId, Side};
use signalkeeper::port::SettlementGateway;
use signalkeeper::testkit::domain::position;
use signalkeeper::testkit::fakes::{GatedSettlement, RecordingSettlement, ScriptedOracle};
use tokio::sync::watch;

fn config() -> LiquidationConfig {
    LiquidationConfig {
        retry_base_ms: 0,
        retry_max_ms: 0,
        ..LiquidationConfig::default()
    }
}

fn monitor<S: SettlementGateway + 'static>(
    state: &Arc<AppState>,
    oracle: &Arc<ScriptedOracle>,
    settlement: &Arc<S>,
    config: &LiquidationConfig,
) -> LiquidationMonitor {
    LiquidationMonitor::new(
        Arc::clone(state),
        oracle.clone(),
        settlement.clone(),
        config,
    )
}

#[tokio::test]
async fn breached_position_is_settled_and_untracked() {
    let state = Arc::new(AppState::default());
    // YES at 50, 5x: liquidation at 34 points
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.34)));
    let settlement = Arc::new(RecordingSettlement::new());

    let report = monitor(&state, &oracle, &settlement, &config())
        .check_once()
        .await;

    assert_eq!(report.checked, 1);
    assert_eq!(report.liquidated, vec![PositionId::new(1)]);
    assert_eq!(settlement.settled(), vec![PositionId::new(1)]);
    assert!(!state.is_tracked(PositionId::new(1)));
    assert_eq!(state.stats().snapshot(0).liquidations, 1);
}

#[tokio::test]
async fn healthy_position_is_left_alone() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.35)));
    let settlement = Arc::new(RecordingSettlement::new());

    let report = monitor(&state, &oracle, &settlement, &config())
        .check_once()
        .await;

    assert_eq!(report.checked, 1);
    assert!(report.liquidated.is_empty());
    assert_eq!(settlement.attempts(), 0);
    assert!(state.is_tracked(PositionId::new(1)));
}

#[tokio::test]
async fn no_side_is_priced_from_the_complement() {
    let state = Arc::new(AppState::default());
    // NO at 40, 4x: liquidation at 20 NO points, i.e. YES at 0.80
    state.track(position(1, "m1", Side::No, dec!(40), dec!(10), 4));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.80)));
    let settlement = Arc::new(RecordingSettlement::new());

    let report = monitor(&state, &oracle, &settlement, &config())
        .check_once()
        .await;

    assert_eq!(report.liquidated, vec![PositionId::new(1)]);
}

#[tokio::test]
async fn one_quote_per_market_per_pass() {
    let state = Arc::new(AppState::default());
    for id in 1..=3 {
        state.track(position(id, "m1", Side::Yes, dec!(50), dec!(10), 2));
    }
    state.track(position(4, "m2", Side::No, dec!(50), dec!(10), 2));
    let oracle = Arc::new(
        ScriptedOracle::new()
            .with_yes("m1", dec!(0.5))
            .with_yes("m2", dec!(0.5)),
    );
    let settlement = Arc::new(RecordingSettlement::new());

    let report = monitor(&state, &oracle, &settlement, &config())
        .check_once()
        .await;

    assert_eq!(report.checked, 4);
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn unpriced_market_is_skipped() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "unknown", Side::Yes, dec!(50), dec!(10), 10));
    let oracle = Arc::new(ScriptedOracle::new());
    let settlement = Arc::new(RecordingSettlement::new());

    let report = monitor(&state, &oracle, &settlement, &config())
        .check_once()
        .await;

    assert_eq!(report.checked, 0);
    assert_eq!(report.skipped_no_price, 1);
    assert!(state.is_tracked(PositionId::new(1)));
}

#[tokio::test]
async fn failed_settlement_keeps_position_and_retries() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.10)));
    let settlement = Arc::new(RecordingSettlement::new().failing_first(1));
    let monitor = monitor(&state, &oracle, &settlement, &config());

    let first = monitor.check_once().await;
    assert_eq!(first.failed, vec![PositionId::new(1)]);
    assert!(state.is_tracked(PositionId::new(1)));
    assert!(!state.is_settling(PositionId::new(1)));

    let second = monitor.check_once().await;
    assert_eq!(second.liquidated, vec![PositionId::new(1)]);
    assert_eq!(settlement.attempts(), 2);
    assert_eq!(state.stats().snapshot(0).settlement_failures, 1);
}

#[tokio::test]
async fn failed_settlement_backs_off() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.10)));
    let settlement = Arc::new(RecordingSettlement::new().failing_first(1));
    let config = LiquidationConfig {
        retry_base_ms: 60_000,
        retry_max_ms: 60_000,
        ..LiquidationConfig::default()
    };
    let monitor = monitor(&state, &oracle, &settlement, &config);

    monitor.check_once().await;
    let second = monitor.check_once().await;

    assert_eq!(second.deferred, 1);
    assert_eq!(settlement.attempts(), 1);
}

#[tokio::test]
async fn retry_state_is_dropped_with_the_position() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    state.track(position(2, "m2", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(
        ScriptedOracle::new()
            .with_yes("m1", dec!(0.10))
            .with_yes("m2", dec!(0.50)),
    );
    let settlement = Arc::new(RecordingSettlement::new().failing_first(1));
    let config = LiquidationConfig {
        retry_base_ms: 60_000,
        retry_max_ms: 60_000,
        ..LiquidationConfig::default()
    };
    let monitor = monitor(&state, &oracle, &settlement, &config);

    monitor.check_once().await;
    assert_eq!(monitor.pending_retries(), 1);

    state.untrack(PositionId::new(1));
    monitor.check_once().await;
    assert_eq!(monitor.pending_retries(), 0);

    // A reused id starts without backoff.
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let report = monitor.check_once().await;
    assert_eq!(report.liquidated, vec![PositionId::new(1)]);
}

#[tokio::test]
async fn retry_state_is_cleared_when_the_book_empties() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.10)));
    let settlement = Arc::new(RecordingSettlement::new().failing_first(1));
    let monitor = monitor(&state, &oracle, &settlement, &config());

    monitor.check_once().await;
    assert_eq!(monitor.pending_retries(), 1);

    state.untrack(PositionId::new(1));
    monitor.check_once().await;
    assert_eq!(monitor.pending_retries(), 0);
}

#[tokio::test]
async fn overlapping_checks_settle_once() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.10)));
    let settlement = Arc::new(GatedSettlement::closed());
    let monitor = Arc::new(monitor(&state, &oracle, &settlement, &config()));

    let first = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move { monitor.check_once().await })
    };
    tokio::time::timeout(Duration::from_secs(2), async {
        while settlement.in_flight() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .unwrap();

    let second = monitor.check_once().await;
    assert_eq!(second.deferred, 1);
    assert!(second.liquidated.is_empty());
    assert!(second.failed.is_empty());

    settlement.open();
    let first = tokio::time::timeout(Duration::from_secs(2), first)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.liquidated, vec![PositionId::new(1)]);
    assert_eq!(settlement.attempts(), 1);
    assert_eq!(settlement.settled(), vec![PositionId::new(1)]);
    assert!(!state.is_settling(PositionId::new(1)));
}

#[tokio::test]
async fn settlements_respect_the_concurrency_bound() {
    let state = Arc::new(AppState::default());
    for id in 1..=6 {
        state.track(position(id, "m1", Side::Yes, dec!(50), dec!(100), 5));
    }
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.10)));
    let settlement = Arc::new(GatedSettlement::holding(Duration::from_millis(20)));
    let config = LiquidationConfig {
        max_concurrent_settlements: 2,
        ..config()
    };

    let report = monitor(&state, &oracle, &settlement, &config)
        .check_once()
        .await;

    assert_eq!(report.liquidated.len(), 6);
    assert_eq!(settlement.attempts(), 6);
    assert_eq!(settlement.peak(), 2);
    assert!(state.positions().is_empty());
}

#[tokio::test]
async fn oversized_position_is_checked_without_overflow() {
    let state = Arc::new(AppState::default());
    let huge = Decimal::MAX / dec!(3);
    state.track(position(1, "m1", Side::Yes, dec!(50), huge, 3));
    state.track(position(2, "m1", Side::Yes, dec!(50), huge, 3));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.10)));
    let settlement = Arc::new(RecordingSettlement::new());

    let report = monitor(&state, &oracle, &settlement, &config())
        .check_once()
        .await;

    assert_eq!(report.checked, 2);
    assert_eq!(
        report.liquidated,
        vec![PositionId::new(1), PositionId::new(2)]
    );
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    let oracle = Arc::new(ScriptedOracle::new().with_yes("m1", dec!(0.01)));
    let settlement = Arc::new(RecordingSettlement::new());
    let monitor = Arc::new(monitor(&state, &oracle, &settlement, &config()));

    let (tx, rx) = watch::channel(false);
    let task = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move { monitor.run(Duration::from_millis(5), rx).await })
    };

    tokio::time::timeout(Duration::from_secs(2), async {
        while state.is_tracked(PositionId::new(1)) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settlement.settled(), vec![PositionId::new(1)]);
}
