//! Running agent counters.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::domain::ExecutionRoute;
use crate::port::OracleStats;

/// Counters updated by the router, liquidation monitor and hedge manager.
#[derive(Debug)]
pub struct AgentStats {
    started_at: DateTime<Utc>,
    trades_processed: AtomicU64,
    spot_trades: AtomicU64,
    synthetic_trades: AtomicU64,
    spot_failures: AtomicU64,
    liquidations: AtomicU64,
    settlement_failures: AtomicU64,
    hedge_transfers: AtomicU64,
    bridged_volume: Mutex<Decimal>,
    total_hedged: Mutex<Decimal>,
}

/// Point-in-time copy of [`AgentStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub trades_processed: u64,
    pub spot_trades: u64,
    pub synthetic_trades: u64,
    pub spot_failures: u64,
    pub liquidations: u64,
    pub settlement_failures: u64,
    pub hedge_transfers: u64,
    pub bridged_volume: Decimal,
    pub total_hedged: Decimal,
    pub active_positions: usize,
}

impl AgentStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            trades_processed: AtomicU64::new(0),
            spot_trades: AtomicU64::new(0),
            synthetic_trades: AtomicU64::new(0),
            spot_failures: AtomicU64::new(0),
            liquidations: AtomicU64::new(0),
            settlement_failures: AtomicU64::new(0),
            hedge_transfers: AtomicU64::new(0),
            bridged_volume: Mutex::new(Decimal::ZERO),
            total_hedged: Mutex::new(Decimal::ZERO),
        }
    }

    /// Count a processed trade; returns the new total.
    pub fn record_trade(&self, route: ExecutionRoute) -> u64 {
        match route {
            ExecutionRoute::Spot => self.spot_trades.fetch_add(1, Ordering::Relaxed),
            ExecutionRoute::Synthetic => self.synthetic_trades.fetch_add(1, Ordering::Relaxed),
        };
        self.trades_processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_bridged(&self, amount: Decimal) {
        let mut volume = self.bridged_volume.lock();
        *volume = volume.saturating_add(amount);
    }

    pub fn record_spot_failure(&self) {
        self.spot_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_liquidation(&self) {
        self.liquidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settlement_failure(&self) {
        self.settlement_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hedge(&self, amount: Decimal) {
        self.hedge_transfers.fetch_add(1, Ordering::Relaxed);
        let mut hedged = self.total_hedged.lock();
        *hedged = hedged.saturating_add(amount);
    }

    #[must_use]
    pub fn trades_processed(&self) -> u64 {
        self.trades_processed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self, active_positions: usize) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            trades_processed: self.trades_processed.load(Ordering::Relaxed),
            spot_trades: self.spot_trades.load(Ordering::Relaxed),
            synthetic_trades: self.synthetic_trades.load(Ordering::Relaxed),
            spot_failures: self.spot_failures.load(Ordering::Relaxed),
            liquidations: self.liquidations.load(Ordering::Relaxed),
            settlement_failures: self.settlement_failures.load(Ordering::Relaxed),
            hedge_transfers: self.hedge_transfers.load(Ordering::Relaxed),
            bridged_volume: *self.bridged_volume.lock(),
            total_hedged: *self.total_hedged.lock(),
            active_positions,
        }
    }
}

impl Default for AgentStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSnapshot {
    /// Emit the summary as one structured log line.
    pub fn log(&self, oracle: &OracleStats) {
        let uptime = Utc::now() - self.started_at;
        info!(
            uptime_secs = uptime.num_seconds(),
            trades = self.trades_processed,
            spot = self.spot_trades,
            synthetic = self.synthetic_trades,
            spot_failures = self.spot_failures,
            active_positions = self.active_positions,
            liquidations = self.liquidations,
            settlement_failures = self.settlement_failures,
            hedges = self.hedge_transfers,
            total_hedged = %self.total_hedged,
            bridged_volume = %self.bridged_volume,
            oracle_requests = oracle.requests_served,
            oracle_fees = %oracle.fees_paid,
            "Agent statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn counts_routes_and_totals() {
        let stats = AgentStats::new();
        assert_eq!(stats.record_trade(ExecutionRoute::Spot), 1);
        assert_eq!(stats.record_trade(ExecutionRoute::Synthetic), 2);
        assert_eq!(stats.record_trade(ExecutionRoute::Synthetic), 3);
        stats.record_bridged(dec!(25));
        stats.record_hedge(dec!(1000));
        stats.record_hedge(dec!(1000));
        stats.record_liquidation();

        let snapshot = stats.snapshot(2);
        assert_eq!(snapshot.trades_processed, 3);
        assert_eq!(snapshot.spot_trades, 1);
        assert_eq!(snapshot.synthetic_trades, 2);
        assert_eq!(snapshot.bridged_volume, dec!(25));
        assert_eq!(snapshot.hedge_transfers, 2);
        assert_eq!(snapshot.total_hedged, dec!(2000));
        assert_eq!(snapshot.liquidations, 1);
        assert_eq!(snapshot.active_positions, 2);
    }
}
