//! Wilder momentum oscillator (RSI-style).
//!
//! change[t] = close[t] - close[t-1], split into gain and loss parts.
//! Both parts are smoothed with an exponential average, alpha = 1/period,
//! seeded with the first change and recursive afterwards.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), a zero avg_loss replaced by
//! `LOSS_EPSILON`.
//! Lookback: period.

use crate::components::indicator::Indicator;

/// Substitute for a zero average loss.
pub const LOSS_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("rsi_{period}")
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        calculate_momentum(closes, self.period)
    }
}

/// Momentum oscillator in [0, 100]. Indices `< period` are NaN.
///
/// A NaN close taints every later value.
pub fn calculate_momentum(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < 2 {
        return result;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        if change.is_nan() {
            return result;
        }
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        if i >= period {
            result[i] = oscillator(avg_gain, avg_loss);
        }
    }

    result
}

fn oscillator(avg_gain: f64, avg_loss: f64) -> f64 {
    let denom = if avg_loss == 0.0 { LOSS_EPSILON } else { avg_loss };
    let ratio = avg_gain / denom;
    100.0 - 100.0 / (1.0 + ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let result = Rsi::new(3).compute(&closes);
        // Zero loss → epsilon denominator → effectively 100
        assert_approx(result[3], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let closes = [105.0, 104.0, 103.0, 102.0, 101.0, 100.0];
        let result = Rsi::new(3).compute(&closes);
        assert_approx(result[3], 0.0, 1e-12);
    }

    #[test]
    fn rsi_flat_prices_read_zero() {
        let closes = [100.0; 8];
        let result = calculate_momentum(&closes, 3);
        assert_approx(result[5], 0.0, 1e-12);
    }

    #[test]
    fn rsi_wilder_recursion() {
        // Changes: +0.34, -0.25, -0.48, +0.72, alpha = 1/3
        // i=1: g=0.34, l=0
        // i=2: g=2/3*0.34, l=1/3*0.25
        // i=3: g=2/3*g2, l=1/3*0.48 + 2/3*l2
        let closes = [44.0, 44.34, 44.09, 43.61, 44.33];
        let result = calculate_momentum(&closes, 3);

        let a = 1.0 / 3.0;
        let g2 = (1.0 - a) * 0.34;
        let l2 = a * 0.25;
        let g3 = (1.0 - a) * g2;
        let l3 = a * 0.48 + (1.0 - a) * l2;
        let expected3 = 100.0 - 100.0 / (1.0 + g3 / l3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], expected3, 1e-6);
        assert!(result[4] > result[3], "a gain must lift the oscillator");
    }

    #[test]
    fn rsi_bounds() {
        let closes = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        let result = Rsi::new(3).compute(&closes);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_nan_taints_rest() {
        let closes = [100.0, 101.0, f64::NAN, 103.0, 104.0, 105.0];
        let result = Rsi::new(2).compute(&closes);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_warmup_length() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64).sin()).collect();
        let result = Rsi::new(14).compute(&closes);
        assert!(result[..14].iter().all(|v| v.is_nan()));
        assert!(result[14..].iter().all(|v| !v.is_nan()));
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
