//! Order routing through the public API.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signalkeeper::adapter::receipt_file::BridgeTxFile;
use signalkeeper::app::{AppState, OrderRouter, RouteOutcome};
use signalkeeper::domain::{DomainError, ExecutionRoute, PositionId, Side};
use signalkeeper::error::Error;
use signalkeeper::port::BridgePurpose;
use signalkeeper::testkit::domain::opened;
use signalkeeper::testkit::fakes::RecordingBridge;

fn router(bridge: Arc<RecordingBridge>) -> (Arc<AppState>, OrderRouter) {
    let state = Arc::new(AppState::default());
    let router = OrderRouter::new(Arc::clone(&state), bridge);
    (state, router)
}

#[tokio::test]
async fn spot_position_is_bridged_not_tracked() {
    let bridge = Arc::new(RecordingBridge::new());
    let (state, router) = router(Arc::clone(&bridge));

    let outcome = router
        .route(opened(1, "m1", Side::Yes, dec!(60), dec!(250), 1))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RouteOutcome::SpotBridged {
            tx_hash: Some("0xbridge1".into())
        }
    );
    assert!(!state.is_tracked(PositionId::new(1)));

    let requests = bridge.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount, dec!(250));
    assert!(matches!(
        &requests[0].purpose,
        BridgePurpose::SpotPurchase { side: Side::Yes, .. }
    ));

    let stats = state.stats().snapshot(0);
    assert_eq!(stats.spot_trades, 1);
    assert_eq!(stats.bridged_volume, dec!(250));
    assert_eq!(state.latest_bridge_tx().as_deref(), Some("0xbridge1"));
}

#[tokio::test]
async fn leveraged_position_is_tracked_with_liquidation_price() {
    let bridge = Arc::new(RecordingBridge::new());
    let (state, router) = router(Arc::clone(&bridge));

    let outcome = router
        .route(opened(2, "m1", Side::No, dec!(50), dec!(100), 5))
        .await
        .unwrap();

    // 50 - 0.80 * 100 / 5
    assert_eq!(
        outcome,
        RouteOutcome::SyntheticTracked {
            liquidation_price: Some(dec!(34))
        }
    );
    assert!(state.is_tracked(PositionId::new(2)));
    assert!(bridge.requests().is_empty());
    assert_eq!(
        state.positions().get(PositionId::new(2)).unwrap().route(),
        ExecutionRoute::Synthetic
    );
}

#[tokio::test]
async fn repeated_synthetic_position_is_a_duplicate() {
    let (state, router) = router(Arc::new(RecordingBridge::new()));
    let event = opened(3, "m1", Side::Yes, dec!(40), dec!(10), 3);

    router.route(event.clone()).await.unwrap();
    let second = router.route(event).await.unwrap();

    assert_eq!(second, RouteOutcome::Duplicate);
    assert_eq!(state.positions().len(), 1);
    assert_eq!(state.stats().trades_processed(), 1);
}

#[tokio::test]
async fn repeated_spot_position_is_bridged_once() {
    let bridge = Arc::new(RecordingBridge::new());
    let (state, router) = router(Arc::clone(&bridge));
    let event = opened(7, "m", Side::Yes, dec!(50), dec!(250), 1);

    let first = router.route(event.clone()).await.unwrap();
    let second = router.route(event).await.unwrap();

    assert!(matches!(first, RouteOutcome::SpotBridged { .. }));
    assert_eq!(second, RouteOutcome::Duplicate);
    assert_eq!(bridge.requests().len(), 1);

    let stats = state.stats().snapshot(0);
    assert_eq!(stats.spot_trades, 1);
    assert_eq!(stats.bridged_volume, dec!(250));
}

#[tokio::test]
async fn failed_spot_bridge_can_be_retried() {
    let (state, router) = router(Arc::new(RecordingBridge::failing()));
    let event = opened(9, "m", Side::No, dec!(45), dec!(20), 1);

    let first = router.route(event.clone()).await.unwrap();
    let second = router.route(event).await.unwrap();

    assert!(first.is_failure());
    assert!(second.is_failure());
    assert_eq!(state.stats().snapshot(0).spot_failures, 2);
}

#[tokio::test]
async fn unrepresentable_notional_is_rejected() {
    let bridge = Arc::new(RecordingBridge::new());
    let (state, router) = router(Arc::clone(&bridge));

    let result = router
        .route(opened(10, "m", Side::Yes, dec!(50), Decimal::MAX / dec!(2), 4_000_000_000))
        .await;

    assert!(matches!(
        result,
        Err(Error::Domain(DomainError::NotionalOverflow { .. }))
    ));
    assert!(state.positions().is_empty());
    assert!(bridge.requests().is_empty());
}

#[tokio::test]
async fn bridge_failure_is_reported_not_hidden() {
    let (state, router) = router(Arc::new(RecordingBridge::failing()));

    let outcome = router
        .route(opened(4, "m1", Side::Yes, dec!(60), dec!(25), 1))
        .await
        .unwrap();

    assert!(outcome.is_failure());
    let stats = state.stats().snapshot(0);
    assert_eq!(stats.spot_failures, 1);
    assert_eq!(stats.bridged_volume, dec!(0));
    assert!(state.latest_bridge_tx().is_none());
}

#[tokio::test]
async fn invalid_event_is_rejected() {
    let (state, router) = router(Arc::new(RecordingBridge::new()));

    let zero_leverage = router
        .route(opened(5, "m1", Side::Yes, dec!(60), dec!(25), 0))
        .await;
    let bad_price = router
        .route(opened(6, "m1", Side::Yes, dec!(140), dec!(25), 2))
        .await;

    assert!(zero_leverage.is_err());
    assert!(bad_price.is_err());
    assert!(state.positions().is_empty());
    assert_eq!(state.stats().trades_processed(), 0);
}

#[tokio::test]
async fn spot_bridging_can_be_disabled() {
    let bridge = Arc::new(RecordingBridge::new());
    let state = Arc::new(AppState::default());
    let router = OrderRouter::new(Arc::clone(&state), bridge.clone()).with_bridge_spot(false);

    let outcome = router
        .route(opened(7, "m1", Side::No, dec!(30), dec!(5), 1))
        .await
        .unwrap();

    assert_eq!(outcome, RouteOutcome::SpotRecorded);
    assert!(bridge.requests().is_empty());
}

#[tokio::test]
async fn bridge_tx_is_published_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = BridgeTxFile::new(dir.path().join("latest_bridge_tx.json"));
    let state = Arc::new(AppState::default());
    let router = OrderRouter::new(Arc::clone(&state), Arc::new(RecordingBridge::new()))
        .with_tx_file(file.clone());

    router
        .route(opened(8, "m1", Side::Yes, dec!(55), dec!(12), 1))
        .await
        .unwrap();

    assert_eq!(file.read().unwrap().tx_hash, "0xbridge1");
}
