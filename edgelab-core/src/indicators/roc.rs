//! Percent change over a fixed number of bars, one of the ensemble voters.
//!
//! roc[t] = 100 × (close[t] / close[t-period] - 1)
//!
//! A NaN or non-positive base close leaves that index NaN; unlike the other
//! indicators a gap only affects the indices that read it.
//! Lookback: period.

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    name: String,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "change period must be >= 1");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("roc_{period}")
    }
}

impl Indicator for Roc {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut change = vec![f64::NAN; closes.len()];
        for (i, pair) in closes.windows(self.period + 1).enumerate() {
            let (base, now) = (pair[0], pair[self.period]);
            if base > 0.0 && !now.is_nan() {
                change[i + self.period] = 100.0 * (now / base - 1.0);
            }
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn compares_against_period_bars_back() {
        let change = Roc::new(3).compute(&[50.0, 52.0, 51.0, 49.0, 53.0]);
        assert!(change[..3].iter().all(|v| v.is_nan()));
        assert_approx(change[3], -2.0, 1e-9);
        assert_approx(change[4], 100.0 * (53.0 / 52.0 - 1.0), DEFAULT_EPSILON);
    }

    #[test]
    fn default_voter_levels() {
        // Five-bar voter enters below -2 and leaves above +1.
        let change = Roc::new(5).compute(&[100.0, 99.0, 99.5, 98.0, 97.5, 97.0, 98.5, 101.5]);
        assert!(change[5] < -2.0);
        assert!(change[6] > -2.0 && change[6] < 1.0);
        assert!(change[7] > 1.0);
    }

    #[test]
    fn gap_only_touches_dependent_indices() {
        let change = Roc::new(1).compute(&[80.0, f64::NAN, 88.0, 99.0]);
        assert!(change[1].is_nan());
        assert!(change[2].is_nan());
        assert_approx(change[3], 12.5, DEFAULT_EPSILON);
    }

    #[test]
    fn non_positive_base_is_missing() {
        let change = Roc::new(1).compute(&[0.0, 10.0, -5.0, 4.0]);
        assert!(change[1].is_nan());
        assert!(change[3].is_nan());
        assert_approx(change[2], -150.0, DEFAULT_EPSILON);
    }

    #[test]
    fn short_series_is_all_missing() {
        assert!(Roc::new(5).compute(&[1.0, 2.0, 3.0]).iter().all(|v| v.is_nan()));
        assert_eq!(Roc::new(14).lookback(), 14);
    }
}
