//! Stand-ins for on-chain execution when no key is configured or in dry-run.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::domain::PositionId;
use crate::error::Result;
use crate::port::{Bridge, BridgeOutcome, BridgePurpose, BridgeRequest, SettlementGateway, SettlementReceipt};

/// Logs the transfer it would make and reports `Simulated`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBridge {
    delay: Duration,
}

impl SimulatedBridge {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Bridge for SimulatedBridge {
    async fn bridge(&self, request: &BridgeRequest) -> Result<BridgeOutcome> {
        let purpose = match &request.purpose {
            BridgePurpose::SpotPurchase { market_id, side } => format!("spot {side} on {market_id}"),
            BridgePurpose::Hedge => "hedge".to_string(),
        };
        info!(amount = %request.amount, purpose = %purpose, "Simulating bridge to Polygon");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(BridgeOutcome::Simulated)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Transaction hash reported by [`DryRunSettlement`].
pub const DRY_RUN_TX: &str = "dry-run";

/// Logs the settlement it would send.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSettlement;

#[async_trait]
impl SettlementGateway for DryRunSettlement {
    async fn settle_position(&self, position_id: PositionId) -> Result<SettlementReceipt> {
        info!(position_id = %position_id, "Dry run: would send settlePosition");
        Ok(SettlementReceipt {
            tx_hash: DRY_RUN_TX.into(),
            block_number: None,
            gas_used: None,
        })
    }
}
