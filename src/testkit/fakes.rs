//! In-memory port implementations for testing.
//!
//! - [`ScriptedOracle`] - Fixed YES prices per market, mutable mid-test.
//! - [`RecordingSettlement`] - Records settled ids; can fail the first N calls.
//! - [`GatedSettlement`] - Holds settlements open until released; tracks concurrency.
//! - [`RecordingBridge`] - Records requests; can fail every call.
//! - [`ScriptedEventSource`] - Chain head and events set by the test.
//! - [`FixedVault`] - Constant vault balance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::watch;

use crate::domain::{MarketId, MarketQuote, PositionId, QuoteSource};
use crate::error::{ExecutionError, OracleError, Result};
use crate::port::{
    Bridge, BridgeOutcome, BridgeRequest, OracleStats, PositionEventSource, PositionOpened,
    PriceOracle, SettlementGateway, SettlementReceipt, VaultReader,
};

// ---------------------------------------------------------------------------
// ScriptedOracle
// ---------------------------------------------------------------------------

/// Oracle returning live quotes from a price table. Unknown markets fail
/// with `MarketNotFound`; [`ScriptedOracle::go_down`] fails everything.
#[derive(Default)]
pub struct ScriptedOracle {
    prices: Mutex<HashMap<MarketId, Decimal>>,
    down: Mutex<bool>,
    calls: AtomicU64,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the YES probability (0..1) of `market`.
    pub fn set_yes(&self, market: &str, yes_price: Decimal) {
        self.prices.lock().insert(MarketId::new(market), yes_price);
    }

    #[must_use]
    pub fn with_yes(self, market: &str, yes_price: Decimal) -> Self {
        self.set_yes(market, yes_price);
        self
    }

    pub fn go_down(&self) {
        *self.down.lock() = true;
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceOracle for ScriptedOracle {
    async fn quote(&self, market_id: &MarketId) -> Result<MarketQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.down.lock() {
            return Err(OracleError::Unavailable("scripted outage".into()).into());
        }
        let yes_price = self
            .prices
            .lock()
            .get(market_id)
            .copied()
            .ok_or_else(|| OracleError::MarketNotFound {
                market: market_id.to_string(),
            })?;

        Ok(MarketQuote {
            market_id: market_id.clone(),
            question: format!("Scripted {market_id}"),
            yes_price,
            volume: Decimal::ZERO,
            liquidity: Decimal::ZERO,
            source: QuoteSource::Live,
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn stats(&self) -> OracleStats {
        OracleStats {
            requests_served: self.calls(),
            fees_paid: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSettlement
// ---------------------------------------------------------------------------

/// Settlement gateway that records every successful settlement.
#[derive(Default)]
pub struct RecordingSettlement {
    settled: Mutex<Vec<PositionId>>,
    failures_left: AtomicU32,
    attempts: AtomicU32,
}

impl RecordingSettlement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `n` settlement attempts.
    #[must_use]
    pub fn failing_first(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn settled(&self) -> Vec<PositionId> {
        self.settled.lock().clone()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettlementGateway for RecordingSettlement {
    async fn settle_position(&self, position_id: PositionId) -> Result<SettlementReceipt> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ExecutionError::SettlementFailed {
                position_id,
                reason: "scripted failure".into(),
            }
            .into());
        }

        let mut settled = self.settled.lock();
        settled.push(position_id);
        Ok(SettlementReceipt {
            tx_hash: format!("0x{:064x}", settled.len()),
            block_number: Some(settled.len() as u64),
            gas_used: Some(21_000),
        })
    }
}

// ---------------------------------------------------------------------------
// GatedSettlement
// ---------------------------------------------------------------------------

/// Settlement gateway whose calls wait for an open gate, then hold for a
/// fixed time before succeeding.
pub struct GatedSettlement {
    inner: RecordingSettlement,
    gate: watch::Sender<bool>,
    hold: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl GatedSettlement {
    /// Calls block until [`Self::open`].
    pub fn closed() -> Self {
        Self::build(false, Duration::ZERO)
    }

    /// Calls proceed immediately and take `hold` each.
    pub fn holding(hold: Duration) -> Self {
        Self::build(true, hold)
    }

    fn build(open: bool, hold: Duration) -> Self {
        let (gate, _) = watch::channel(open);
        Self {
            inner: RecordingSettlement::new(),
            gate,
            hold,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Release every waiting and future call.
    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    /// Calls currently inside the gateway.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Most calls ever inside the gateway at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn settled(&self) -> Vec<PositionId> {
        self.inner.settled()
    }

    pub fn attempts(&self) -> u32 {
        self.inner.attempts()
    }
}

#[async_trait]
impl SettlementGateway for GatedSettlement {
    async fn settle_position(&self, position_id: PositionId) -> Result<SettlementReceipt> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        let mut gate = self.gate.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = gate.wait_for(|open| *open).await;
        tokio::time::sleep(self.hold).await;

        let result = self.inner.settle_position(position_id).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// ---------------------------------------------------------------------------
// RecordingBridge
// ---------------------------------------------------------------------------

/// Bridge that records requests and returns a submitted outcome.
#[derive(Default)]
pub struct RecordingBridge {
    requests: Mutex<Vec<BridgeRequest>>,
    failing: bool,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge whose every transfer fails.
    pub fn failing() -> Self {
        Self {
            requests: Mutex::default(),
            failing: true,
        }
    }

    pub fn requests(&self) -> Vec<BridgeRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Bridge for RecordingBridge {
    async fn bridge(&self, request: &BridgeRequest) -> Result<BridgeOutcome> {
        let mut requests = self.requests.lock();
        requests.push(request.clone());
        if self.failing {
            return Err(ExecutionError::BridgeFailed("scripted failure".into()).into());
        }
        Ok(BridgeOutcome::Submitted {
            tx_hash: format!("0xbridge{}", requests.len()),
            block_number: None,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

// ---------------------------------------------------------------------------
// ScriptedEventSource
// ---------------------------------------------------------------------------

/// Event source over an in-memory chain. Events are returned when their
/// `block_number` falls in the queried range.
#[derive(Default)]
pub struct ScriptedEventSource {
    head: AtomicU64,
    events: Mutex<Vec<PositionOpened>>,
    queries: Mutex<Vec<(u64, u64)>>,
}

impl ScriptedEventSource {
    pub fn new(head: u64) -> Self {
        Self {
            head: AtomicU64::new(head),
            ..Self::default()
        }
    }

    pub fn set_head(&self, head: u64) {
        self.head.store(head, Ordering::SeqCst);
    }

    pub fn push(&self, event: PositionOpened) {
        self.events.lock().push(event);
    }

    /// Ranges queried so far.
    pub fn queries(&self) -> Vec<(u64, u64)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl PositionEventSource for ScriptedEventSource {
    async fn latest_block(&self) -> Result<u64> {
        Ok(self.head.load(Ordering::SeqCst))
    }

    async fn position_opened(&self, from_block: u64, to_block: u64) -> Result<Vec<PositionOpened>> {
        self.queries.lock().push((from_block, to_block));
        Ok(self
            .events
            .lock()
            .iter()
            .filter(|e| (from_block..=to_block).contains(&e.block_number))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// FixedVault
// ---------------------------------------------------------------------------

/// Vault reader with a constant balance.
pub struct FixedVault(pub Decimal);

#[async_trait]
impl VaultReader for FixedVault {
    async fn vault_balance(&self) -> Result<Decimal> {
        Ok(self.0)
    }
}
