//! Chain event listener.
//!
//! Polls the vault for `PositionOpened` events and hands each new one to the
//! [`OrderRouter`]. Every poll re-scans a few blocks behind the last
//! processed block; already routed positions are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::router::{OrderRouter, RouteOutcome};
use super::shutdown_requested;
use super::state::AppState;
use crate::adapter::receipt_file::write_atomic;
use crate::domain::PositionId;
use crate::error::Result;
use crate::port::{PositionEventSource, PriceOracle};

/// Last processed block, persisted across restarts.
#[derive(Debug, Clone)]
pub struct BlockCheckpoint {
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRecord {
    last_block: u64,
}

impl BlockCheckpoint {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored block, or `None` when no checkpoint exists yet.
    #[allow(clippy::result_large_err)]
    pub fn load(&self) -> Result<Option<u64>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let record: CheckpointRecord = serde_json::from_str(&content)?;
        Ok(Some(record.last_block))
    }

    #[allow(clippy::result_large_err)]
    pub fn save(&self, last_block: u64) -> Result<()> {
        let json = serde_json::to_string(&CheckpointRecord { last_block })?;
        write_atomic(&self.path, json.as_bytes())
    }
}

/// Counts from one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    pub from_block: u64,
    pub to_block: u64,
    pub routed: usize,
    pub duplicates: usize,
    pub invalid: usize,
    pub failed: usize,
}

pub struct EventListener {
    source: Arc<dyn PositionEventSource>,
    router: Arc<OrderRouter>,
    state: Arc<AppState>,
    lookback: u64,
    checkpoint: Option<BlockCheckpoint>,
    stats_every: u64,
    stats_oracle: Option<Arc<dyn PriceOracle>>,
    last_block: Option<u64>,
    /// Events at or below this block predate the listener and are ignored.
    floor: u64,
    /// Routed position ids and their block, pruned to the scan window.
    seen: BTreeMap<PositionId, u64>,
}

impl EventListener {
    #[must_use]
    pub fn new(
        source: Arc<dyn PositionEventSource>,
        router: Arc<OrderRouter>,
        state: Arc<AppState>,
        lookback: u64,
    ) -> Self {
        Self {
            source,
            router,
            state,
            lookback,
            checkpoint: None,
            stats_every: 0,
            stats_oracle: None,
            last_block: None,
            floor: 0,
            seen: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_checkpoint(mut self, checkpoint: BlockCheckpoint) -> Self {
        self.checkpoint = Some(checkpoint);
        self
    }

    /// Log agent statistics every `every` processed trades.
    #[must_use]
    pub fn with_stats(mut self, every: u64, oracle: Arc<dyn PriceOracle>) -> Self {
        self.stats_every = every;
        self.stats_oracle = Some(oracle);
        self
    }

    #[must_use]
    pub const fn last_block(&self) -> Option<u64> {
        self.last_block
    }

    /// Pick the starting block: the checkpoint if present, else the chain head.
    pub async fn initialize(&mut self) -> Result<u64> {
        let stored = match &self.checkpoint {
            Some(checkpoint) => checkpoint.load().unwrap_or_else(|e| {
                warn!(error = %e, "Unreadable block checkpoint, starting from chain head");
                None
            }),
            None => None,
        };

        let start = match stored {
            Some(block) => {
                info!(block, "Resuming from checkpoint");
                block
            }
            None => {
                let head = self.source.latest_block().await?;
                info!(block = head, "Starting from chain head");
                head
            }
        };

        self.last_block = Some(start);
        self.floor = start;
        Ok(start)
    }

    /// Route events in `[last - lookback, head]` not seen before.
    pub async fn poll_once(&mut self) -> Result<PollReport> {
        let last = match self.last_block {
            Some(last) => last,
            None => self.initialize().await?,
        };

        let head = self.source.latest_block().await?;
        if head < last {
            debug!(head, last, "Chain head behind last processed block, skipping poll");
            return Ok(PollReport::default());
        }

        let from_block = last.saturating_sub(self.lookback);
        let events = self.source.position_opened(from_block, head).await?;
        let mut report = PollReport {
            from_block,
            to_block: head,
            ..PollReport::default()
        };

        for event in events {
            let id = event.position_id;
            if event.block_number <= self.floor || self.seen.contains_key(&id) {
                continue;
            }
            self.seen.insert(id, event.block_number);

            match self.router.route(event).await {
                Ok(RouteOutcome::Duplicate) => report.duplicates += 1,
                Ok(outcome) if outcome.is_failure() => report.failed += 1,
                Ok(_) => {
                    report.routed += 1;
                    self.maybe_log_stats();
                }
                Err(e) => {
                    report.invalid += 1;
                    warn!(position_id = %id, error = %e, "Invalid PositionOpened event, ignoring");
                }
            }
        }

        let window_start = head.saturating_sub(self.lookback);
        self.seen.retain(|_, block| *block >= window_start);
        self.last_block = Some(head);

        if let Some(checkpoint) = &self.checkpoint {
            if let Err(e) = checkpoint.save(head) {
                warn!(error = %e, "Could not persist block checkpoint");
            }
        }

        Ok(report)
    }

    /// Poll every `poll_interval` until shutdown. Errors are logged and retried.
    pub async fn run(&mut self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_interval_ms = poll_interval.as_millis() as u64,
            lookback = self.lookback,
            "Listening for PositionOpened events"
        );

        loop {
            match self.poll_once().await {
                Ok(report) if report.routed + report.invalid + report.failed > 0 => {
                    debug!(?report, "Poll complete");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Listener poll failed"),
            }

            tokio::select! {
                () = shutdown_requested(&mut shutdown) => break,
                () = tokio::time::sleep(poll_interval) => {}
            }
        }
        info!("Event listener stopped");
    }

    fn maybe_log_stats(&self) {
        let Some(oracle) = &self.stats_oracle else {
            return;
        };
        let trades = self.state.stats().trades_processed();
        if self.stats_every > 0 && trades > 0 && trades % self.stats_every == 0 {
            let active = self.state.positions().len();
            self.state.stats().snapshot(active).log(&oracle.stats());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = BlockCheckpoint::new(dir.path().join("state/checkpoint.json"));
        assert_eq!(checkpoint.load().unwrap(), None);
        checkpoint.save(1234).unwrap();
        assert_eq!(checkpoint.load().unwrap(), Some(1234));
    }

    #[test]
    fn corrupt_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        fs::write(&path, "not json").unwrap();
        assert!(BlockCheckpoint::new(path).load().is_err());
    }
}
