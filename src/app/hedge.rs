//! Vault hedging.
//!
//! Synthetic positions leave the vault holding the opposite side of every
//! trade. When YES and NO notional drift apart by more than the threshold,
//! USDC is bridged to Polygon to offset the imbalance there.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::config::HedgeConfig;
use super::shutdown_requested;
use super::state::AppState;
use crate::domain::{Collateral, VaultExposure};
use crate::port::{Bridge, BridgeRequest, VaultReader};

/// Result of one hedge check.
#[derive(Debug, Clone, PartialEq)]
pub enum HedgeOutcome {
    /// Imbalance within threshold, or already covered.
    Balanced { exposure: VaultExposure },
    Hedged {
        exposure: VaultExposure,
        amount: Collateral,
        tx_hash: Option<String>,
    },
    Failed {
        exposure: VaultExposure,
        reason: String,
    },
}

pub struct HedgeManager {
    state: Arc<AppState>,
    vault: Arc<dyn VaultReader>,
    bridge: Arc<dyn Bridge>,
    threshold: Collateral,
    bridge_amount: Collateral,
    /// Amount already bridged against the current imbalance.
    cover: Mutex<Collateral>,
}

impl HedgeManager {
    #[must_use]
    pub fn new(
        state: Arc<AppState>,
        vault: Arc<dyn VaultReader>,
        bridge: Arc<dyn Bridge>,
        config: &HedgeConfig,
    ) -> Self {
        Self {
            state,
            vault,
            bridge,
            threshold: config.threshold,
            bridge_amount: config.bridge_amount,
            cover: Mutex::new(Decimal::ZERO),
        }
    }

    /// Current vault exposure. An unreadable balance counts as zero.
    pub async fn calculate_exposure(&self) -> VaultExposure {
        let balance = match self.vault.vault_balance().await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(error = %e, "Could not read vault balance");
                Decimal::ZERO
            }
        };
        let positions = self.state.positions();
        VaultExposure::from_positions(positions.iter(), balance)
    }

    #[must_use]
    pub fn cover(&self) -> Collateral {
        *self.cover.lock()
    }

    pub async fn check_once(&self) -> HedgeOutcome {
        let exposure = self.calculate_exposure().await;
        let imbalance = exposure.imbalance();

        // Cover never exceeds the imbalance it offsets; a balanced book resets it.
        let cover = {
            let mut cover = self.cover.lock();
            *cover = (*cover).min(imbalance);
            *cover
        };

        info!(
            vault_balance = %exposure.vault_balance,
            yes = %exposure.yes_exposure,
            no = %exposure.no_exposure,
            imbalance = %imbalance,
            cover = %cover,
            "Vault exposure"
        );

        if !exposure.needs_hedge(self.threshold, cover) {
            debug!("Vault balanced, no hedge needed");
            return HedgeOutcome::Balanced { exposure };
        }

        warn!(
            imbalance = %imbalance,
            threshold = %self.threshold,
            dominant = ?exposure.dominant_side(),
            amount = %self.bridge_amount,
            "Hedge triggered"
        );

        match self.bridge.bridge(&BridgeRequest::hedge(self.bridge_amount)).await {
            Ok(outcome) => {
                let mut cover = self.cover.lock();
                *cover = cover.saturating_add(self.bridge_amount);
                drop(cover);
                self.state.stats().record_hedge(self.bridge_amount);
                let tx_hash = outcome.tx_hash().map(str::to_string);
                info!(
                    amount = %self.bridge_amount,
                    bridge = self.bridge.name(),
                    tx_hash = tx_hash.as_deref().unwrap_or("simulated"),
                    "Hedge bridged to Polygon"
                );
                HedgeOutcome::Hedged {
                    exposure,
                    amount: self.bridge_amount,
                    tx_hash,
                }
            }
            Err(e) => {
                error!(error = %e, bridge = self.bridge.name(), "Hedge bridge failed");
                HedgeOutcome::Failed {
                    exposure,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Repeat [`Self::check_once`] every `interval` until shutdown.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_ms = interval.as_millis() as u64,
            threshold = %self.threshold,
            "Hedge manager started"
        );

        loop {
            tokio::select! {
                () = shutdown_requested(&mut shutdown) => break,
                _ = ticker.tick() => {
                    self.check_once().await;
                }
            }
        }
        info!("Hedge manager stopped");
    }
}
