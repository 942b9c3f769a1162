//! Strategy components.
//!
//! A strategy is a signal rule (entry/exit conditions for one family) plus a
//! sizing policy, both fed by precomputed indicators:
//! - Indicator trait and the per-run value container
//! - Signal rules: mean reversion, trend following, hybrid, ensemble
//! - Factory: typed parameter variants → rule
//! - Sizing: fixed fraction or Kelly

pub mod factory;
pub mod indicator;
pub mod signal;
pub mod sizing;

pub use factory::{StrategyKind, StrategyParams};
pub use indicator::{Indicator, IndicatorValues};
pub use signal::{DecisionContext, SignalRule};
pub use sizing::Sizing;
