//! Concrete indicator implementations.
//!
//! Every indicator reads closes only and implements the `Indicator` trait from
//! `components::indicator`. They are precomputed once before the bar loop and
//! read per-bar by the strategy rules via `IndicatorValues`.
//!
//! The closes-only series also have free-function forms: `calculate_momentum`,
//! `calculate_volatility`, `calculate_efficiency_ratio`, `calculate_trend_line`.

pub mod efficiency;
pub mod ema;
pub mod roc;
pub mod rsi;
pub mod volatility;
pub mod zscore;

pub use efficiency::{calculate_efficiency_ratio, classify_regime, EfficiencyRatio, Regime};
pub use ema::{calculate_trend_line, Ema};
pub use roc::Roc;
pub use rsi::{calculate_momentum, Rsi};
pub use volatility::{calculate_volatility, CloseRange};
pub use zscore::ZScore;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
