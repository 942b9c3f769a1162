//! EdgeLab Runner: parameter search over `edgelab-core` backtests.
//!
//! This crate builds on `edgelab-core` to provide:
//! - Parameter spaces per strategy family, with sampling and zoom
//! - Acceptance constraints (trade count, outlier share, drawdown floor)
//! - Config fingerprinting and a deduplicated leaderboard
//! - Parallel random search and coarse-to-fine refinement
//! - TOML search configuration

pub mod config;
pub mod constraints;
pub mod error;
pub mod fingerprint;
pub mod fitness;
pub mod leaderboard;
pub mod rng;
pub mod search;
pub mod space;

pub use config::{SearchConfig, ZoomConfig};
pub use constraints::{Constraints, Rejection, RejectionCounts};
pub use error::SearchError;
pub use fingerprint::{fingerprint, ConfigId};
pub use fitness::FitnessMetric;
pub use leaderboard::{Candidate, InsertResult, Leaderboard};
pub use rng::RngHierarchy;
pub use search::{refine, run_random_search, run_search, SearchReport};
pub use space::{FloatRange, IntRange, ParamSpace, StrategySpace};
