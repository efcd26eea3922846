//! Liquidation monitor.
//!
//! Each check prices every tracked position with the held side's current
//! price and settles those at or beyond the liquidation threshold.
//! A position is only untracked once its settlement succeeds; failed
//! settlements are retried with exponential backoff.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::config::LiquidationConfig;
use super::shutdown_requested;
use super::state::AppState;
use crate::domain::{HealthLevel, MarketId, MarketQuote, PnlSnapshot, Position, PositionId};
use crate::port::{PriceOracle, SettlementGateway};

/// Counts from one liquidation check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Positions priced this round.
    pub checked: usize,
    /// Positions whose market had no price.
    pub skipped_no_price: usize,
    /// Liquidatable positions left for later (in flight or backing off).
    pub deferred: usize,
    pub liquidated: Vec<PositionId>,
    pub failed: Vec<PositionId>,
}

#[derive(Debug, Clone, Copy)]
struct RetryState {
    attempts: u32,
    next_attempt: Instant,
}

enum Settled {
    Liquidated(PositionId),
    Failed(PositionId),
    Skipped,
}

pub struct LiquidationMonitor {
    state: Arc<AppState>,
    oracle: Arc<dyn PriceOracle>,
    settlement: Arc<dyn SettlementGateway>,
    max_concurrent: usize,
    retry_base: Duration,
    retry_max: Duration,
    retries: DashMap<PositionId, RetryState>,
}

impl LiquidationMonitor {
    #[must_use]
    pub fn new(
        state: Arc<AppState>,
        oracle: Arc<dyn PriceOracle>,
        settlement: Arc<dyn SettlementGateway>,
        config: &LiquidationConfig,
    ) -> Self {
        Self {
            state,
            oracle,
            settlement,
            max_concurrent: config.max_concurrent_settlements.max(1),
            retry_base: Duration::from_millis(config.retry_base_ms),
            retry_max: Duration::from_millis(config.retry_max_ms),
            retries: DashMap::new(),
        }
    }

    /// Run one liquidation pass.
    pub async fn check_once(&self) -> CheckReport {
        let mut report = CheckReport::default();

        let positions = self.state.positions().snapshot();
        let tracked: BTreeSet<PositionId> = positions.iter().map(Position::id).collect();
        self.retries.retain(|id, _| tracked.contains(id));
        if positions.is_empty() {
            return report;
        }

        let quotes = self.fetch_quotes(&positions).await;
        let policy = self.state.policy();
        let now = Instant::now();
        let mut candidates = Vec::new();

        for position in &positions {
            let Some(quote) = quotes.get(position.market_id()) else {
                report.skipped_no_price += 1;
                continue;
            };
            report.checked += 1;

            let pnl = position.pnl_at(quote.price_points(position.side()));
            let health = policy.health(&pnl);
            let log_line = |message: &str| {
                info!(
                    position_id = %position.id(),
                    side = %position.side(),
                    leverage = position.leverage(),
                    entry = %pnl.entry_price,
                    current = %pnl.current_price,
                    pnl_pct = %pnl.percent().round_dp(1),
                    health = ?health,
                    simulated = quote.is_simulated(),
                    "{message}"
                );
            };
            match health {
                HealthLevel::Healthy => debug!(
                    position_id = %position.id(),
                    pnl_pct = %pnl.percent().round_dp(1),
                    "Position healthy"
                ),
                HealthLevel::Warning => log_line("Position approaching liquidation"),
                HealthLevel::Liquidatable => log_line("Liquidation triggered"),
            }

            if !policy.should_liquidate(&pnl) {
                continue;
            }
            if self.state.is_settling(position.id()) || self.in_backoff(position.id(), now) {
                report.deferred += 1;
                continue;
            }
            candidates.push((position.id(), pnl));
        }

        let results: Vec<Settled> = stream::iter(candidates)
            .map(|(id, pnl)| self.settle(id, pnl))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        for result in results {
            match result {
                Settled::Liquidated(id) => report.liquidated.push(id),
                Settled::Failed(id) => report.failed.push(id),
                Settled::Skipped => report.deferred += 1,
            }
        }
        report.liquidated.sort();
        report.failed.sort();

        if report.liquidated.is_empty() && report.failed.is_empty() {
            debug!(checked = report.checked, "All positions safe");
        }
        report
    }

    /// Repeat [`Self::check_once`] every `interval` until shutdown.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_ms = interval.as_millis() as u64,
            threshold = %self.state.policy().threshold(),
            "Liquidation monitor started"
        );

        loop {
            tokio::select! {
                () = shutdown_requested(&mut shutdown) => break,
                _ = ticker.tick() => {
                    let report = self.check_once().await;
                    if report.checked + report.skipped_no_price > 0 {
                        debug!(?report, "Liquidation check complete");
                    }
                }
            }
        }
        info!("Liquidation monitor stopped");
    }

    /// Positions with a failed settlement awaiting retry.
    #[must_use]
    pub fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    /// One quote per distinct market, fetched concurrently.
    async fn fetch_quotes(&self, positions: &[Position]) -> HashMap<MarketId, MarketQuote> {
        let markets: BTreeSet<&MarketId> = positions.iter().map(|p| p.market_id()).collect();
        let results = join_all(markets.into_iter().map(|market| async move {
            (market.clone(), self.oracle.quote(market).await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(market, result)| match result {
                Ok(quote) => Some((market, quote)),
                Err(e) => {
                    warn!(market = %market, error = %e, "No price, skipping market this round");
                    None
                }
            })
            .collect()
    }

    fn in_backoff(&self, id: PositionId, now: Instant) -> bool {
        self.retries
            .get(&id)
            .is_some_and(|retry| retry.next_attempt > now)
    }

    /// Delay before the next attempt after `attempts` failures.
    fn backoff_delay(&self, attempts: u32) -> Duration {
        let exponent = attempts.saturating_sub(1).min(20);
        self.retry_base
            .saturating_mul(1u32 << exponent)
            .min(self.retry_max)
    }

    async fn settle(&self, id: PositionId, pnl: PnlSnapshot) -> Settled {
        if !self.state.begin_settlement(id) {
            return Settled::Skipped;
        }
        if !self.state.is_tracked(id) {
            // closed while this check was running
            self.state.end_settlement(id);
            return Settled::Skipped;
        }

        info!(position_id = %id, pnl_pct = %pnl.percent().round_dp(1), "Executing settlePosition");
        let result = self.settlement.settle_position(id).await;

        let settled = match result {
            Ok(receipt) => {
                self.state.untrack(id);
                self.retries.remove(&id);
                self.state.stats().record_liquidation();
                info!(
                    position_id = %id,
                    tx_hash = %receipt.tx_hash,
                    block = ?receipt.block_number,
                    gas_used = ?receipt.gas_used,
                    "Position liquidated"
                );
                Settled::Liquidated(id)
            }
            Err(e) => {
                self.state.stats().record_settlement_failure();
                let attempts = self
                    .retries
                    .get(&id)
                    .map_or(0, |retry| retry.attempts)
                    .saturating_add(1);
                let delay = self.backoff_delay(attempts);
                self.retries.insert(
                    id,
                    RetryState {
                        attempts,
                        next_attempt: Instant::now() + delay,
                    },
                );
                error!(
                    position_id = %id,
                    attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "Settlement failed, position kept"
                );
                Settled::Failed(id)
            }
        };

        self.state.end_settlement(id);
        settled
    }
}
