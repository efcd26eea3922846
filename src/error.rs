use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::PositionId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// On-chain execution errors.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("no signing key configured: {0}")]
    NoSigner(&'static str),

    #[error("failed to submit transaction: {0}")]
    SubmissionFailed(String),

    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("settlement of position {position_id} failed: {reason}")]
    SettlementFailed {
        position_id: PositionId,
        reason: String,
    },

    #[error("bridge transfer failed: {0}")]
    BridgeFailed(String),
}

/// Price oracle errors.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("market '{market}' not found")]
    MarketNotFound { market: String },

    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("market '{market}' quoted YES at {price}, outside 0-1")]
    InvalidPrice { market: String, price: Decimal },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("chain RPC error: {0}")]
    Chain(String),
}

pub type Result<T> = std::result::Result<T, Error>;
