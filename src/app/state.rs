//! Shared application state.

use std::collections::BTreeSet;

use dashmap::DashSet;
use parking_lot::{Mutex, RwLock};

use super::statistics::AgentStats;
use crate::domain::{LiquidationPolicy, Position, PositionBook, PositionId};

/// Spot ids remembered for deduplication. The lowest ids are forgotten first.
pub const SPOT_HISTORY_LIMIT: usize = 10_000;

/// State shared by the listener, API, liquidation monitor and hedge manager.
pub struct AppState {
    /// Synthetic positions tracked for liquidation.
    positions: RwLock<PositionBook>,
    /// Positions with a settlement transaction in flight.
    settling: DashSet<PositionId>,
    /// Spot positions already routed, bounded by [`SPOT_HISTORY_LIMIT`].
    spot_routed: Mutex<BTreeSet<PositionId>>,
    policy: LiquidationPolicy,
    stats: AgentStats,
    latest_bridge_tx: RwLock<Option<String>>,
}

impl AppState {
    #[must_use]
    pub fn new(policy: LiquidationPolicy) -> Self {
        Self {
            positions: RwLock::new(PositionBook::new()),
            settling: DashSet::new(),
            spot_routed: Mutex::new(BTreeSet::new()),
            policy,
            stats: AgentStats::new(),
            latest_bridge_tx: RwLock::new(None),
        }
    }

    /// Get read access to positions.
    pub fn positions(&self) -> parking_lot::RwLockReadGuard<'_, PositionBook> {
        self.positions.read()
    }

    /// Get write access to positions.
    pub fn positions_mut(&self) -> parking_lot::RwLockWriteGuard<'_, PositionBook> {
        self.positions.write()
    }

    /// Track a position. Returns false if its id is already tracked.
    pub fn track(&self, position: Position) -> bool {
        self.positions.write().insert(position)
    }

    pub fn untrack(&self, id: PositionId) -> Option<Position> {
        self.positions.write().remove(id)
    }

    #[must_use]
    pub fn is_tracked(&self, id: PositionId) -> bool {
        self.positions.read().contains(id)
    }

    /// Claim the settlement slot for `id`. False if one is already in flight.
    pub fn begin_settlement(&self, id: PositionId) -> bool {
        self.settling.insert(id)
    }

    pub fn end_settlement(&self, id: PositionId) {
        self.settling.remove(&id);
    }

    #[must_use]
    pub fn is_settling(&self, id: PositionId) -> bool {
        self.settling.contains(&id)
    }

    /// Claim `id` for spot routing. False if it was already routed.
    pub fn claim_spot(&self, id: PositionId) -> bool {
        let mut routed = self.spot_routed.lock();
        if !routed.insert(id) {
            return false;
        }
        while routed.len() > SPOT_HISTORY_LIMIT {
            routed.pop_first();
        }
        true
    }

    /// Forget a spot claim so the position can be routed again.
    pub fn release_spot(&self, id: PositionId) {
        self.spot_routed.lock().remove(&id);
    }

    #[must_use]
    pub const fn policy(&self) -> &LiquidationPolicy {
        &self.policy
    }

    #[must_use]
    pub const fn stats(&self) -> &AgentStats {
        &self.stats
    }

    pub fn set_latest_bridge_tx(&self, tx_hash: impl Into<String>) {
        *self.latest_bridge_tx.write() = Some(tx_hash.into());
    }

    #[must_use]
    pub fn latest_bridge_tx(&self) -> Option<String> {
        self.latest_bridge_tx.read().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LiquidationPolicy::default())
    }
}
