//! Component construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::adapter::arc::{ArcVault, CctpBridge};
use crate::adapter::polymarket::{PolymarketClient, PolymarketOracle};
use crate::adapter::receipt_file::BridgeTxFile;
use crate::adapter::simulated::{DryRunSettlement, SimulatedBridge};
use crate::app::config::{Config, FallbackMode};
use crate::app::oracle::{AmmOracle, FallbackOracle};
use crate::app::router::OrderRouter;
use crate::app::state::AppState;
use crate::domain::{LiquidationPolicy, SimulatedAmm};
use crate::error::Result;
use crate::port::{Bridge, PriceOracle, SettlementGateway};

/// Everything the loops and the API share.
pub(crate) struct Services {
    pub state: Arc<AppState>,
    pub oracle: Arc<dyn PriceOracle>,
    pub vault: Arc<ArcVault>,
    pub settlement: Arc<dyn SettlementGateway>,
    pub bridge: Arc<dyn Bridge>,
    pub router: Arc<OrderRouter>,
}

/// Live Polymarket oracle, with AMM fallback unless disabled.
pub fn build_oracle(config: &Config, state: &Arc<AppState>) -> Result<Arc<dyn PriceOracle>> {
    let client = PolymarketClient::from_config(&config.oracle);
    let live: Arc<dyn PriceOracle> = Arc::new(PolymarketOracle::new(client, config.oracle.x402_fee));

    let fallback: Option<Arc<dyn PriceOracle>> = match config.oracle.fallback {
        FallbackMode::Amm => {
            let amm = SimulatedAmm::new(config.oracle.initial_liquidity)?;
            Some(Arc::new(AmmOracle::new(Arc::clone(state), amm)))
        }
        FallbackMode::None => None,
    };

    Ok(Arc::new(FallbackOracle::new(live, fallback)))
}

pub(crate) fn build_services(config: &Config) -> Result<Services> {
    let policy = LiquidationPolicy::new(config.liquidation.threshold)?;
    let state = Arc::new(AppState::new(policy));
    let oracle = build_oracle(config, &state)?;
    let vault = Arc::new(ArcVault::from_config(&config.chain)?);

    let simulated_bridge = || -> Arc<dyn Bridge> {
        Arc::new(SimulatedBridge::new(Duration::from_millis(
            config.router.simulated_bridge_delay_ms,
        )))
    };

    let settlement: Arc<dyn SettlementGateway>;
    let bridge: Arc<dyn Bridge>;
    if config.dry_run {
        info!("Dry-run mode: settlements and bridges are simulated");
        settlement = Arc::new(DryRunSettlement);
        bridge = simulated_bridge();
    } else if config.chain.has_signer() {
        let cctp = CctpBridge::from_config(&config.chain)?;
        info!(agent = %cctp.agent_address(), "Agent signer loaded");
        settlement = vault.clone();
        bridge = Arc::new(cctp);
    } else {
        warn!("AGENT_PRIVATE_KEY not set: settlements and bridges are simulated");
        settlement = Arc::new(DryRunSettlement);
        bridge = simulated_bridge();
    }

    let mut router = OrderRouter::new(Arc::clone(&state), Arc::clone(&bridge))
        .with_bridge_spot(config.router.bridge_spot);
    if let Some(path) = &config.router.latest_bridge_tx_file {
        router = router.with_tx_file(BridgeTxFile::new(path.clone()));
    }

    Ok(Services {
        state,
        oracle,
        vault,
        settlement,
        bridge,
        router: Arc::new(router),
    })
}
