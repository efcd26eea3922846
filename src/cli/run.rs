//! Handler for the `run` command.

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::app::App;
use crate::cli::{banner, load_config, RunArgs};
use crate::error::Result;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if args.dry_run {
        config.dry_run = true;
    }

    config.init_logging();

    if !args.no_banner && !args.json_logs {
        banner::print_banner();
    }

    if config.dry_run {
        info!("Dry-run mode enabled - no transactions will be sent");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C, shutting down");
        }
        let _ = shutdown_tx.send(true);
    });

    App::run(config, shutdown_rx).await
}
