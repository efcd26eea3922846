//! Order routing: spot positions are bridged, leveraged ones tracked.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::state::AppState;
use crate::adapter::receipt_file::BridgeTxFile;
use crate::domain::{ExecutionRoute, Price};
use crate::error::Result;
use crate::port::{Bridge, BridgeRequest, PositionOpened};

/// What happened to a routed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Spot collateral bridged. `tx_hash` is `None` for simulated transfers.
    SpotBridged { tx_hash: Option<String> },
    /// Spot position accepted without bridging.
    SpotRecorded,
    /// The bridge transfer failed; nothing was executed.
    SpotFailed { reason: String },
    /// Leveraged position tracked for liquidation.
    SyntheticTracked { liquidation_price: Option<Price> },
    /// Position id already tracked or already routed as spot.
    Duplicate,
}

impl RouteOutcome {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::SpotFailed { .. })
    }
}

pub struct OrderRouter {
    state: Arc<AppState>,
    bridge: Arc<dyn Bridge>,
    bridge_spot: bool,
    tx_file: Option<BridgeTxFile>,
}

impl OrderRouter {
    #[must_use]
    pub fn new(state: Arc<AppState>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            state,
            bridge,
            bridge_spot: true,
            tx_file: None,
        }
    }

    /// Disable bridging of spot collateral.
    #[must_use]
    pub const fn with_bridge_spot(mut self, bridge_spot: bool) -> Self {
        self.bridge_spot = bridge_spot;
        self
    }

    /// Publish successful bridge transactions to `file`.
    #[must_use]
    pub fn with_tx_file(mut self, file: BridgeTxFile) -> Self {
        self.tx_file = Some(file);
        self
    }

    /// Validate and route an opened position.
    ///
    /// Each position id is routed once. A spot position whose bridge
    /// failed may be routed again.
    ///
    /// # Errors
    ///
    /// Returns a domain error when the event carries invalid values.
    #[allow(clippy::result_large_err)]
    pub async fn route(&self, event: PositionOpened) -> Result<RouteOutcome> {
        let tx_hash = event.tx_hash.clone();
        let position = event.into_position(Utc::now())?;
        let route = position.route();

        let duplicate = match route {
            ExecutionRoute::Spot => !self.state.claim_spot(position.id()),
            ExecutionRoute::Synthetic => self.state.is_tracked(position.id()),
        };
        if duplicate {
            return Ok(RouteOutcome::Duplicate);
        }

        let trade_number = self.state.stats().record_trade(route);
        info!(
            trade = trade_number,
            position_id = %position.id(),
            market = %position.market_id(),
            side = %position.side(),
            collateral = %position.collateral(),
            leverage = position.leverage(),
            trader = position.trader().unwrap_or("-"),
            tx_hash = tx_hash.as_deref().unwrap_or("-"),
            route = %route,
            "New trade"
        );

        let outcome = match route {
            ExecutionRoute::Spot => {
                if !self.bridge_spot {
                    info!(position_id = %position.id(), "Spot position recorded, bridging disabled");
                    return Ok(RouteOutcome::SpotRecorded);
                }

                let request = BridgeRequest::spot(
                    position.collateral(),
                    position.market_id().clone(),
                    position.side(),
                );
                match self.bridge.bridge(&request).await {
                    Ok(bridged) => {
                        self.state.stats().record_bridged(position.collateral());
                        let tx_hash = bridged.tx_hash().map(str::to_string);
                        if let Some(hash) = &tx_hash {
                            self.publish_bridge_tx(hash);
                        }
                        info!(
                            position_id = %position.id(),
                            bridge = self.bridge.name(),
                            tx_hash = tx_hash.as_deref().unwrap_or("simulated"),
                            "Spot collateral bridged to Polygon"
                        );
                        RouteOutcome::SpotBridged { tx_hash }
                    }
                    Err(e) => {
                        // Released so a redelivered event can retry the bridge.
                        self.state.release_spot(position.id());
                        self.state.stats().record_spot_failure();
                        error!(
                            position_id = %position.id(),
                            bridge = self.bridge.name(),
                            error = %e,
                            "Spot bridge failed"
                        );
                        RouteOutcome::SpotFailed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
            ExecutionRoute::Synthetic => {
                let liquidation_price = self.state.policy().liquidation_price(&position);
                let id = position.id();
                let entry = position.entry_price();
                if !self.state.track(position) {
                    return Ok(RouteOutcome::Duplicate);
                }
                info!(
                    position_id = %id,
                    entry = %entry,
                    liquidation_price = ?liquidation_price,
                    "Synthetic position tracked for liquidation"
                );
                RouteOutcome::SyntheticTracked { liquidation_price }
            }
        };

        Ok(outcome)
    }

    fn publish_bridge_tx(&self, tx_hash: &str) {
        self.state.set_latest_bridge_tx(tx_hash);
        if let Some(file) = &self.tx_file {
            if let Err(e) = file.write(tx_hash, Utc::now()) {
                warn!(path = %file.path().display(), error = %e, "Could not write bridge tx file");
            }
        }
    }
}
