//! Rolling z-score of the close.
//!
//! z[t] = (close[t] - mean(window)) / stdev(window), window = last `period` closes,
//! population standard deviation. A zero stdev reads as 0.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;

#[derive(Debug, Clone)]
pub struct ZScore {
    period: usize,
    name: String,
}

impl ZScore {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "z-score period must be >= 2");
        Self {
            period,
            name: Self::key(period),
        }
    }

    pub fn key(period: usize) -> String {
        format!("zscore_{period}")
    }
}

impl Indicator for ZScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &closes[i + 1 - self.period..=i];
            if window.iter().any(|c| c.is_nan()) {
                continue;
            }
            let mean = window.iter().sum::<f64>() / self.period as f64;
            let var = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>()
                / self.period as f64;
            let std = var.sqrt();
            result[i] = if std < 1e-15 {
                0.0
            } else {
                (closes[i] - mean) / std
            };
        }

        result
    }
}
