//! Canonical test configuration.

use crate::app::config::FallbackMode;
use crate::app::Config;

/// Unroutable local RPC; connections are refused immediately.
pub const DEAD_RPC: &str = "http://127.0.0.1:9";

/// Offline configuration: dry-run, listener and API off, short intervals.
pub fn offline() -> Config {
    let mut config = Config::default();
    config.chain.rpc_url = DEAD_RPC.to_string();
    config.oracle.api_url = DEAD_RPC.to_string();
    config.oracle.fallback = FallbackMode::Amm;
    config.dry_run = true;
    config.listener.enabled = false;
    config.api.enabled = false;
    config.hedge.enabled = false;
    config.liquidation.check_interval_ms = 10;
    config.liquidation.retry_base_ms = 0;
    config.liquidation.retry_max_ms = 0;
    config.hedge.check_interval_ms = 10;
    config.listener.poll_interval_ms = 10;
    config.router.simulated_bridge_delay_ms = 0;
    config
}
