//! Backtesting engine: single-slot bar loop and supporting infrastructure.
//!
//! The engine consumes a close series and a `BacktestConfig`, precomputes
//! every indicator the strategy needs, then runs one pass over the bars:
//!
//! 1. Flat: evaluate the entry gates at t-1, size, fill at close[t]
//! 2. In position: tick, evaluate exits in priority order, fill at close[t]
//! 3. After the last bar: close anything still open

pub mod config;
pub mod loop_runner;
pub mod precompute;
pub mod session;
pub mod state;

pub use config::{BacktestConfig, ConfigError};
pub use loop_runner::{compute_quantity, run_backtest};
pub use precompute::{compute_warmup, precompute_indicators};
pub use session::SessionRules;
pub use state::{BacktestResult, EngineState};
