//! Efficiency ratio and regime classification.
//!
//! ER[t] = |close[t] - close[t-period]| / sum(|close[i] - close[i-1]|, i in t-period+1..=t)
//!
//! Near 1: the path went straight (trending). Near 0: it wandered back and
//! forth (mean-reverting). Lookback: period.

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;

/// Guard for a zero path length.
pub const PATH_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct EfficiencyRatio {
    period: usize,
    name: String,
}

impl EfficiencyRatio {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "efficiency ratio period must be >= 1");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("er_{period}")
    }
}

impl Indicator for EfficiencyRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        calculate_efficiency_ratio(closes, self.period)
    }
}

/// Efficiency ratio in [0, 1]. Indices `< period` are NaN.
pub fn calculate_efficiency_ratio(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n <= period {
        return result;
    }

    for i in period..n {
        let net = (closes[i] - closes[i - period]).abs();
        let path: f64 = (i + 1 - period..=i)
            .map(|j| (closes[j] - closes[j - 1]).abs())
            .sum();
        if net.is_nan() || path.is_nan() {
            continue;
        }
        result[i] = (net / path.max(PATH_EPSILON)).clamp(0.0, 1.0);
    }

    result
}

/// Market regime derived from the efficiency ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    MeanReversion,
    Mixed,
    Trending,
}

/// Classify an efficiency ratio value. Returns `None` for NaN.
///
/// `mr_threshold` must be below `trend_threshold`; values between the two
/// (inclusive) are `Mixed`.
pub fn classify_regime(er: f64, mr_threshold: f64, trend_threshold: f64) -> Option<Regime> {
    if er.is_nan() {
        None
    } else if er < mr_threshold {
        Some(Regime::MeanReversion)
    } else if er > trend_threshold {
        Some(Regime::Trending)
    } else {
        Some(Regime::Mixed)
    }
}
