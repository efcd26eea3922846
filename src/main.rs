use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use signalkeeper::cli::{check, quote, run, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match dispatch(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&args).await.context("agent failed")?,
        Commands::Check(args) => check::execute(&args).context("check failed")?,
        Commands::Quote(args) => quote::execute(&args).await.context("quote failed")?,
    }
    Ok(())
}
