//! Close-range volatility proxy.
//!
//! vol[t] = (max(close[t-period+1..=t]) - min(close[t-period+1..=t])) / close[t]
//!
//! Uses closes only: it is a range-over-price proxy, not a true high/low range.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct CloseRange {
    period: usize,
    name: String,
}

impl CloseRange {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volatility period must be >= 1");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("vol_{period}")
    }
}

impl Indicator for CloseRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        calculate_volatility(closes, self.period)
    }
}

/// Non-negative range-over-price series. Indices `< period - 1` are NaN.
pub fn calculate_volatility(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &closes[i + 1 - period..=i];
        if window.iter().any(|c| c.is_nan()) || closes[i] <= 0.0 {
            continue;
        }
        let hi = window.iter().copied().fold(f64::MIN, f64::max);
        let lo = window.iter().copied().fold(f64::MAX, f64::min);
        result[i] = (hi - lo) / closes[i];
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn range_over_close() {
        // window [100, 110, 105] → (110 - 100) / 105
        let closes = [100.0, 110.0, 105.0, 104.0];
        let result = calculate_volatility(&closes, 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 10.0 / 105.0, DEFAULT_EPSILON);
        // window [110, 105, 104] → 6 / 104
        assert_approx(result[3], 6.0 / 104.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_prices_have_zero_volatility() {
        let result = calculate_volatility(&[50.0; 10], 4);
        assert!(result[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn period_one_is_zero() {
        let result = calculate_volatility(&[100.0, 120.0, 90.0], 1);
        assert!(result.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn nan_in_window_is_undefined() {
        let closes = [100.0, f64::NAN, 102.0, 103.0, 104.0];
        let result = calculate_volatility(&closes, 2);
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert!(!result[3].is_nan());
    }

    #[test]
    fn short_series_all_nan() {
        let result = CloseRange::new(5).compute(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn lookback() {
        assert_eq!(CloseRange::new(20).lookback(), 19);
        assert_eq!(CloseRange::new(20).name(), "vol_20");
    }
}
