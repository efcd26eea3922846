//! Implementations of ports (hexagonal adapters).

pub mod arc;
pub mod polymarket;
pub mod receipt_file;
pub mod simulated;
