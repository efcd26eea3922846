//! Application layer - orchestration, configuration, and shared state.

pub mod config;
pub mod hedge;
pub mod liquidation;
pub mod listener;
pub mod oracle;
mod orchestrator;
pub mod router;
mod state;
pub mod statistics;

use tokio::sync::watch;

pub use config::Config;
pub use hedge::{HedgeManager, HedgeOutcome};
pub use liquidation::{CheckReport, LiquidationMonitor};
pub use listener::{BlockCheckpoint, EventListener, PollReport};
pub use oracle::{AmmOracle, FallbackOracle};
pub use orchestrator::{build_oracle, App};
pub use router::{OrderRouter, RouteOutcome};
pub use state::AppState;
pub use statistics::{AgentStats, StatsSnapshot};

/// Resolves once `shutdown` reads true or its sender is dropped.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn shutdown_resolves_on_signal_and_on_drop() {
        let (tx, mut rx) = watch::channel(false);
        let waiter = tokio::spawn(async move { shutdown_requested(&mut rx).await });
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();

        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), shutdown_requested(&mut rx))
            .await
            .unwrap();
    }
}
