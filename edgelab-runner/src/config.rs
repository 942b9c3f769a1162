//! Search configuration, loaded from TOML.
//!
//! Every field has a default, so a file only needs the keys it changes:
//!
//! ```toml
//! master_seed = 7
//! iterations = 2000
//! fitness = "total_return"
//!
//! [constraints]
//! min_trades = 20
//!
//! [zoom]
//! rounds = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use edgelab_core::engine::BacktestConfig;
use edgelab_core::metrics::SharpeScaling;

use crate::constraints::Constraints;
use crate::error::SearchError;
use crate::fitness::FitnessMetric;
use crate::space::ParamSpace;

/// Coarse-to-fine refinement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub rounds: usize,
    /// Samples per round.
    pub iterations: usize,
    /// Width multiplier per round; round `r` uses `factor^(r+1)`.
    pub factor: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            rounds: 2,
            iterations: 200,
            factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub master_seed: u64,
    /// Random-search samples.
    pub iterations: usize,
    pub initial_capital: f64,
    pub fee_per_order: f64,
    pub sharpe_scaling: SharpeScaling,
    pub fitness: FitnessMetric,
    pub constraints: Constraints,
    pub leaderboard_size: usize,
    pub zoom: ZoomConfig,
    pub space: ParamSpace,
    /// Worker threads; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            master_seed: 42,
            iterations: 1000,
            initial_capital: 100_000.0,
            fee_per_order: 1.0,
            sharpe_scaling: SharpeScaling::default(),
            fitness: FitnessMetric::default(),
            constraints: Constraints::default(),
            leaderboard_size: 20,
            zoom: ZoomConfig::default(),
            space: ParamSpace::default(),
            threads: None,
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, SearchError> {
        let config: Self = toml::from_str(s)?;
        config.space.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let text = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Base config that sampled candidates inherit capital, fee and Sharpe
    /// scaling from.
    pub fn template(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.initial_capital,
            fee_per_order: self.fee_per_order,
            sharpe_scaling: self.sharpe_scaling,
            ..Default::default()
        }
    }
}
