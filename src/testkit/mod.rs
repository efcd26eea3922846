//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fakes`] - Port implementations: `ScriptedOracle`, `RecordingSettlement`,
//!   `GatedSettlement`, `RecordingBridge`, `ScriptedEventSource`, `FixedVault`.
//! - [`domain`] - Builders for positions and `PositionOpened` events.
//! - [`config`] - A fast, offline agent configuration.

pub mod config;
pub mod domain;
pub mod fakes;
