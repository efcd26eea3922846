//! App orchestration module.
//!
//! Wires the oracle, vault and bridge adapters into the listener,
//! liquidation monitor, hedge manager and webhook API, and runs them until
//! shutdown.

mod builder;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::{self, ApiContext};
use crate::app::config::Config;
use crate::app::hedge::HedgeManager;
use crate::app::liquidation::LiquidationMonitor;
use crate::app::listener::{BlockCheckpoint, EventListener};
use crate::app::shutdown_requested;
use crate::domain::MarketId;
use crate::error::Result;
use crate::port::PositionEventSource;

pub use builder::build_oracle;
use builder::{build_services, Services};

/// Main application.
pub struct App;

impl App {
    /// Run until `shutdown` reads true.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an unreachable RPC when the listener
    /// is enabled, or an API bind failure.
    pub async fn run(config: Config, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(dry_run = config.dry_run, rpc = %config.chain.rpc_url, "Starting signalkeeper");

        let Services {
            state,
            oracle,
            vault,
            settlement,
            bridge,
            router,
        } = build_services(&config)?;

        match vault.latest_block().await {
            Ok(block) => info!(block, vault = %vault.address(), "Connected to Arc"),
            Err(e) if config.listener.enabled => {
                error!(error = %e, "Cannot reach Arc RPC");
                return Err(e);
            }
            Err(e) => warn!(error = %e, "Cannot reach Arc RPC, continuing without listener"),
        }

        if let Some(market) = &config.oracle.probe_market {
            match oracle.quote(&MarketId::new(market.clone())).await {
                Ok(quote) => info!(
                    market = %market,
                    yes = %quote.yes_price,
                    source = ?quote.source,
                    "Oracle probe ok"
                ),
                Err(e) => warn!(market = %market, error = %e, "Oracle probe failed"),
            }
        }

        let mut tasks: Vec<(&'static str, JoinHandle<()>)> = Vec::new();

        if config.api.enabled {
            let addr = config.api_bind()?;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(addr = %addr, "Webhook API listening");
            let app = api::router(ApiContext {
                state: Arc::clone(&state),
                router: Arc::clone(&router),
                oracle: Arc::clone(&oracle),
            });
            let mut rx = shutdown.clone();
            tasks.push((
                "api",
                tokio::spawn(async move {
                    let result = axum::serve(listener, app)
                        .with_graceful_shutdown(async move { shutdown_requested(&mut rx).await })
                        .await;
                    if let Err(e) = result {
                        error!(error = %e, "Webhook API failed");
                    }
                }),
            ));
        }

        let monitor = Arc::new(LiquidationMonitor::new(
            Arc::clone(&state),
            Arc::clone(&oracle),
            settlement,
            &config.liquidation,
        ));
        let interval = config.liquidation.check_interval();
        let rx = shutdown.clone();
        tasks.push((
            "liquidation",
            tokio::spawn(async move { monitor.run(interval, rx).await }),
        ));

        if config.hedge.enabled {
            let hedger = HedgeManager::new(
                Arc::clone(&state),
                vault.clone(),
                Arc::clone(&bridge),
                &config.hedge,
            );
            let interval = config.hedge.check_interval();
            let rx = shutdown.clone();
            tasks.push((
                "hedge",
                tokio::spawn(async move { hedger.run(interval, rx).await }),
            ));
        }

        if config.listener.enabled {
            let mut listener = EventListener::new(
                vault.clone(),
                Arc::clone(&router),
                Arc::clone(&state),
                config.listener.lookback_blocks,
            )
            .with_stats(config.stats_every_trades, Arc::clone(&oracle));
            if let Some(path) = &config.chain.checkpoint_file {
                listener = listener.with_checkpoint(BlockCheckpoint::new(path.clone()));
            }
            let interval = config.listener.poll_interval();
            let rx = shutdown.clone();
            tasks.push((
                "listener",
                tokio::spawn(async move { listener.run(interval, rx).await }),
            ));
        }

        info!(tasks = tasks.len(), "Agent running");
        shutdown_requested(&mut shutdown).await;
        info!("Shutdown signal received");

        for (name, handle) in tasks {
            if let Err(e) = handle.await {
                warn!(task = name, error = %e, "Task ended abnormally");
            }
        }

        let active = state.positions().len();
        state.stats().snapshot(active).log(&oracle.stats());
        info!("signalkeeper stopped");
        Ok(())
    }
}
