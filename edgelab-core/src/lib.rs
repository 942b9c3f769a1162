//! EdgeLab Core: close-only indicators, strategy rules, the single-slot
//! backtest loop and trade metrics.
//!
//! - Domain types (price bars, positions, trades)
//! - Indicators: Wilder momentum, close-range volatility, efficiency ratio
//! - Strategy rules: mean reversion, trend following, hybrid regime switch,
//!   ensemble vote
//! - Bar loop with t-1 decisions, fixed fees and whole-unit sizing
//! - Trade-level performance metrics
//!
//! No filesystem, network or environment access lives here.

pub mod components;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod metrics;

pub use engine::{run_backtest, BacktestConfig, BacktestResult};
