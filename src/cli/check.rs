//! Configuration validation command.

use crate::adapter::arc::signer_from_key;
use crate::app::config::FallbackMode;
use crate::cli::{load_config, output, ConfigArgs};
use crate::error::Result;

/// Validate configuration without starting the agent.
pub fn execute(args: &ConfigArgs) -> Result<()> {
    output::header(env!("CARGO_PKG_VERSION"));

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::error(&format!("Configuration error: {e}"));
            return Err(e);
        }
    };
    output::success("Configuration is valid");

    output::section("Chain");
    output::field("RPC", &config.chain.rpc_url);
    output::field("Vault", &config.chain.vault_address);
    output::field("USDC", &config.chain.usdc_address);
    output::field("TokenMessenger", &config.chain.token_messenger);
    output::field("Destination", config.chain.destination_domain);

    output::section("Agent");
    output::field("Dry-run", config.dry_run);
    output::field("Liq. threshold", config.liquidation.threshold);
    output::field(
        "Check interval",
        format!("{}ms", config.liquidation.check_interval_ms),
    );
    output::field("Listener", on_off(config.listener.enabled));
    output::field(
        "Hedging",
        if config.hedge.enabled {
            format!("on, threshold {}", config.hedge.threshold)
        } else {
            "off".to_string()
        },
    );
    output::field(
        "Webhook API",
        if config.api.enabled {
            config.api.bind.clone()
        } else {
            "off".to_string()
        },
    );
    output::field(
        "Oracle fallback",
        match config.oracle.fallback {
            FallbackMode::Amm => "amm",
            FallbackMode::None => "none",
        },
    );

    println!();
    match config.chain.private_key.as_deref() {
        Some(key) if config.chain.has_signer() => {
            let signer = signer_from_key(key)?;
            output::success(&format!("Agent signer {}", signer.address()));
        }
        _ if config.dry_run => output::success("Dry-run: no signer needed"),
        _ => output::warning("AGENT_PRIVATE_KEY not set; settlement and bridging are simulated"),
    }

    Ok(())
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
