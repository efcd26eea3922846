//! signalkeeper - liquidation keeper and order router for SignalVault.
//!
//! SignalVault is a leveraged prediction-market vault on the Arc network.
//! This crate runs the off-chain agent that serves it:
//!
//! - **Event listener** polls the vault for `PositionOpened` events.
//! - **Order router** bridges 1x positions to Polygon as spot orders and
//!   tracks leveraged ones as synthetic positions.
//! - **Liquidation monitor** prices synthetic positions through the oracle
//!   and settles those past the liquidation threshold.
//! - **Hedge manager** bridges USDC to Polygon when YES/NO exposure drifts.
//! - **Webhook API** lets the front-end report positions directly.
//!
//! # Modules
//!
//! - [`domain`] - Positions, PnL, liquidation policy, exposure, AMM pricing
//! - [`port`] - Traits for the oracle, vault and bridge
//! - [`adapter`] - Polymarket oracle, Arc vault, CCTP bridge, simulators
//! - [`app`] - Configuration, shared state and the service loops
//! - [`api`] - axum webhook server
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate

pub mod adapter;
pub mod api;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
