//! Indicator precomputation.
//!
//! All indicators are computed once over the full close series before the
//! bar loop begins. Because every indicator is causal, this is equivalent to
//! computing them incrementally.

use crate::components::indicator::{Indicator, IndicatorValues};

/// Compute every indicator over `closes` into one container.
///
/// Indicators sharing a name (e.g. two sub-rules both reading `rsi_14`) are
/// computed once.
pub fn precompute_indicators(closes: &[f64], indicators: &[Box<dyn Indicator>]) -> IndicatorValues {
    let mut iv = IndicatorValues::new();
    for indicator in indicators {
        if iv.get_series(indicator.name()).is_some() {
            continue;
        }
        let series = indicator.compute(closes);
        debug_assert_eq!(
            series.len(),
            closes.len(),
            "indicator '{}' produced {} values for {} closes",
            indicator.name(),
            series.len(),
            closes.len()
        );
        iv.insert(indicator.name(), series);
    }
    iv
}

/// Warmup length: the maximum lookback across all indicators.
///
/// Purely informational for the loop, which gates on NaN values directly,
/// but reported on the result.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
}
