//! Content hash of a backtest config.
//!
//! Two configs with identical parameters always get the same id, so the
//! leaderboard can collapse duplicates that different iterations happened
//! to sample.

use std::fmt;

use serde::{Deserialize, Serialize};

use edgelab_core::engine::BacktestConfig;

/// BLAKE3 hex digest of a config's canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigId(pub String);

impl ConfigId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex chars, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Struct fields serialize in declaration order and `BTreeSet` is sorted,
/// so the JSON bytes are canonical for a given config.
pub fn fingerprint(config: &BacktestConfig) -> Result<ConfigId, serde_json::Error> {
    let json = serde_json::to_vec(config)?;
    Ok(ConfigId(blake3::hash(&json).to_hex().to_string()))
}
