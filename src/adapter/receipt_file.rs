//! Latest bridge transaction file for the front-end.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Contents of the bridge transaction file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTxRecord {
    pub tx_hash: String,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Publishes the most recent bridge transaction hash as JSON.
#[derive(Debug, Clone)]
pub struct BridgeTxFile {
    path: PathBuf,
}

impl BridgeTxFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file with `tx_hash` stamped at `at`.
    #[allow(clippy::result_large_err)]
    pub fn write(&self, tx_hash: &str, at: DateTime<Utc>) -> Result<()> {
        let record = BridgeTxRecord {
            tx_hash: tx_hash.to_string(),
            timestamp: at.timestamp(),
        };
        let json = serde_json::to_string(&record)?;
        write_atomic(&self.path, json.as_bytes())
    }

    #[allow(clippy::result_large_err)]
    pub fn read(&self) -> Result<BridgeTxRecord> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Write via a temp file and rename, creating parent directories.
#[allow(clippy::result_large_err)]
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;

    let cleanup_and_err = |e| {
        let _ = fs::remove_file(&temp_path);
        e
    };

    file.write_all(bytes).map_err(cleanup_and_err)?;
    file.sync_all().map_err(cleanup_and_err)?;
    fs::rename(&temp_path, path).map_err(cleanup_and_err)?;

    Ok(())
}
