//! Smoothed trend line for the trend-following rule.
//!
//! The first `period` closes are averaged to seed the line at index
//! `period - 1`; after that each close pulls it by `2 / (period + 1)`.
//! The trend rule compares a fast and a slow line, and exits when the close
//! drops under the slow one.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "trend line period must be >= 1");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("ema_{period}")
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        calculate_trend_line(closes, self.period)
    }
}

/// Seeded exponential average. Indices `< period - 1` are NaN, and so is
/// everything from the first NaN close onward.
pub fn calculate_trend_line(closes: &[f64], period: usize) -> Vec<f64> {
    let mut line = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() < period {
        return line;
    }

    let seed_window = &closes[..period];
    if seed_window.iter().any(|c| c.is_nan()) {
        return line;
    }
    let mut level = seed_window.iter().sum::<f64>() / period as f64;
    line[period - 1] = level;

    let pull = 2.0 / (period as f64 + 1.0);
    for (slot, &close) in line[period..].iter_mut().zip(&closes[period..]) {
        if close.is_nan() {
            break;
        }
        level += pull * (close - level);
        *slot = level;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn seeds_with_window_average() {
        // seed = (20 + 22 + 24 + 26) / 4 = 23; pull = 0.4
        // 23 + 0.4 × (33 − 23) = 27
        let line = Ema::new(4).compute(&[20.0, 22.0, 24.0, 26.0, 33.0]);
        assert!(line[..3].iter().all(|v| v.is_nan()));
        assert_approx(line[3], 23.0, DEFAULT_EPSILON);
        assert_approx(line[4], 27.0, DEFAULT_EPSILON);
    }

    #[test]
    fn single_bar_line_tracks_close() {
        let closes = [50.0, 47.5, 51.0];
        assert_eq!(calculate_trend_line(&closes, 1), closes.to_vec());
    }

    #[test]
    fn fast_line_leads_slow_on_rally() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let fast = calculate_trend_line(&closes, 5);
        let slow = calculate_trend_line(&closes, 20);
        assert!(slow[18].is_nan());
        for t in 19..30 {
            assert!(fast[t] > slow[t]);
            assert!(closes[t] > slow[t]);
        }
    }

    #[test]
    fn gap_in_seed_leaves_no_values() {
        let line = calculate_trend_line(&[20.0, f64::NAN, 24.0, 26.0, 28.0], 3);
        assert!(line.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn gap_after_seed_stops_the_line() {
        let line = calculate_trend_line(&[20.0, 22.0, 24.0, f64::NAN, 28.0], 3);
        assert_approx(line[2], 22.0, DEFAULT_EPSILON);
        assert!(line[3].is_nan() && line[4].is_nan());
    }

    #[test]
    fn short_series_is_all_missing() {
        assert!(calculate_trend_line(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert_eq!(Ema::new(50).lookback(), 49);
        assert_eq!(Ema::new(1).lookback(), 0);
    }
}
