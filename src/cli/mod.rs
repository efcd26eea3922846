//! Command-line interface definitions.

pub mod banner;
pub mod check;
pub mod output;
pub mod quote;
pub mod run;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::app::Config;
use crate::error::Result;

/// Default config file, used when present and no `-c` is given.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// signalkeeper - liquidation keeper and order router for SignalVault.
#[derive(Parser, Debug)]
#[command(name = "signalkeeper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the agent until Ctrl-C
    Run(RunArgs),

    /// Validate configuration and print a summary
    Check(ConfigArgs),

    /// Fetch one oracle quote for a market
    Quote(QuoteArgs),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Track and report, but never send transactions
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the banner
    #[arg(long)]
    pub no_banner: bool,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Market id, slug or question text
    pub market: String,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Load configuration from `path`, else `config.toml` if it exists, else
/// defaults plus environment overrides.
#[allow(clippy::result_large_err)]
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG),
        None => Config::from_env(|key| std::env::var(key).ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::parse_from([
            "signalkeeper",
            "run",
            "-c",
            "agent.toml",
            "--dry-run",
            "--json-logs",
            "--log-level",
            "debug",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config.as_deref(), Some(Path::new("agent.toml")));
        assert!(args.dry_run);
        assert!(args.json_logs);
        assert!(!args.no_banner);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn quote_takes_a_market() {
        let cli = Cli::parse_from(["signalkeeper", "quote", "will-it-rain"]);
        let Commands::Quote(args) = cli.command else {
            panic!("expected quote");
        };
        assert_eq!(args.market, "will-it-rain");
        assert!(args.config.is_none());
    }
}
