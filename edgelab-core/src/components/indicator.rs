//! Indicator trait and precomputed indicator values container.
//!
//! Indicators are pure functions: close history in, numeric series out.
//! They are precomputed once before the bar loop and read per-bar by the
//! strategy rules. No recomputation on each bar.

use std::collections::HashMap;

/// Trait for indicators.
///
/// Indicators take the full close series and produce an output series of the
/// same length. The first `lookback()` values are `f64::NAN` (warmup).
///
/// The input is a bare `&[f64]` of closes: no other price field exists in
/// the engine, so nothing but the close can feed a decision.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on a close from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Key used in `IndicatorValues` (e.g., "rsi_14", "ema_50").
    fn name(&self) -> &str;

    /// Number of leading bars for which the output is undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire close series.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Container for precomputed indicator values.
///
/// Built once before the bar loop, then queried by bar index during the loop.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Raw value at a bar index, NaN included.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Value at a bar index only if it is past warmup (not NaN).
    ///
    /// Rules use this so that a warmup value can never reach a decision.
    pub fn ready(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.get(name, bar_index).filter(|v| !v.is_nan())
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
