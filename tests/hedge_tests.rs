//! Hedge manager against a recording bridge.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signalkeeper::app::config::HedgeConfig;
use signalkeeper::app::{AppState, HedgeManager, HedgeOutcome};
use signalkeeper::domain::{PositionId, Side};
use signalkeeper::port::BridgePurpose;
use signalkeeper::testkit::domain::position;
use signalkeeper::testkit::fakes::{FixedVault, RecordingBridge};

fn config() -> HedgeConfig {
    HedgeConfig {
        enabled: true,
        threshold: dec!(1000),
        bridge_amount: dec!(500),
        ..HedgeConfig::default()
    }
}

fn manager(state: &Arc<AppState>, bridge: &Arc<RecordingBridge>) -> HedgeManager {
    HedgeManager::new(
        Arc::clone(state),
        Arc::new(FixedVault(dec!(50000))),
        bridge.clone(),
        &config(),
    )
}

#[tokio::test]
async fn exposure_counts_only_synthetic_notional() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(100), 5));
    state.track(position(2, "m1", Side::No, dec!(50), dec!(100), 2));
    state.track(position(3, "m1", Side::Yes, dec!(50), dec!(900), 1));
    let bridge = Arc::new(RecordingBridge::new());

    let exposure = manager(&state, &bridge).calculate_exposure().await;

    assert_eq!(exposure.vault_balance, dec!(50000));
    assert_eq!(exposure.yes_exposure, dec!(500));
    assert_eq!(exposure.no_exposure, dec!(200));
    assert_eq!(exposure.imbalance(), dec!(300));
}

#[tokio::test]
async fn small_imbalance_is_not_hedged() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(200), 5));
    let bridge = Arc::new(RecordingBridge::new());

    let outcome = manager(&state, &bridge).check_once().await;

    assert!(matches!(outcome, HedgeOutcome::Balanced { .. }));
    assert!(bridge.requests().is_empty());
}

#[tokio::test]
async fn large_imbalance_is_hedged_until_covered() {
    let state = Arc::new(AppState::default());
    // 2000 YES notional, threshold 1000, 500 per transfer
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(400), 5));
    let bridge = Arc::new(RecordingBridge::new());
    let manager = manager(&state, &bridge);

    let first = manager.check_once().await;
    assert!(matches!(first, HedgeOutcome::Hedged { amount, .. } if amount == dec!(500)));
    assert_eq!(manager.cover(), dec!(500));

    let second = manager.check_once().await;
    assert!(matches!(second, HedgeOutcome::Hedged { .. }));

    // 2000 - 1000 cover is no longer above the threshold
    let third = manager.check_once().await;
    assert!(matches!(third, HedgeOutcome::Balanced { .. }));

    let requests = bridge.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.purpose == BridgePurpose::Hedge));
    let stats = state.stats().snapshot(1);
    assert_eq!(stats.hedge_transfers, 2);
    assert_eq!(stats.total_hedged, dec!(1000));
}

#[tokio::test]
async fn cover_shrinks_with_the_imbalance() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::Yes, dec!(50), dec!(400), 5));
    let bridge = Arc::new(RecordingBridge::new());
    let manager = manager(&state, &bridge);

    manager.check_once().await;
    state.untrack(PositionId::new(1));
    manager.check_once().await;

    assert_eq!(manager.cover(), dec!(0));
}

#[tokio::test]
async fn failed_hedge_does_not_add_cover() {
    let state = Arc::new(AppState::default());
    state.track(position(1, "m1", Side::No, dec!(50), dec!(400), 5));
    let bridge = Arc::new(RecordingBridge::failing());
    let manager = manager(&state, &bridge);

    let outcome = manager.check_once().await;

    assert!(matches!(outcome, HedgeOutcome::Failed { .. }));
    assert_eq!(manager.cover(), dec!(0));
    assert_eq!(state.stats().snapshot(1).hedge_transfers, 0);
}

#[tokio::test]
async fn oversized_exposure_saturates_and_hedges() {
    let state = Arc::new(AppState::default());
    let huge = Decimal::MAX / dec!(3);
    state.track(position(1, "m1", Side::Yes, dec!(50), huge, 3));
    state.track(position(2, "m1", Side::Yes, dec!(50), huge, 3));
    let bridge = Arc::new(RecordingBridge::new());

    let outcome = manager(&state, &bridge).check_once().await;

    assert!(matches!(
        outcome,
        HedgeOutcome::Hedged { exposure, .. } if exposure.yes_exposure == Decimal::MAX
    ));
    assert_eq!(bridge.requests().len(), 1);
}
