//! Fitness function: configurable metric selector for candidate ranking.

use edgelab_core::metrics::Metrics;
use serde::{Deserialize, Serialize};

/// Which metric to optimize/sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMetric {
    #[default]
    Sharpe,
    TotalReturn,
    WinRate,
    ProfitFactor,
    MaxDrawdown,
}

impl FitnessMetric {
    /// Extract the relevant metric value.
    pub fn extract(&self, metrics: &Metrics) -> f64 {
        match self {
            Self::Sharpe => metrics.sharpe,
            Self::TotalReturn => metrics.total_return_pct,
            Self::WinRate => metrics.win_rate_pct,
            Self::ProfitFactor => metrics.profit_factor,
            Self::MaxDrawdown => metrics.max_drawdown_pct,
        }
    }

    /// Returns true if `a` is better than `b`.
    ///
    /// `a > b` is correct for every metric: drawdown is stored non-positive,
    /// so -5.0 > -20.0 means the smaller drawdown wins.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        a > b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgelab_core::metrics::ExitCounts;

    fn sample_metrics() -> Metrics {
        Metrics {
            trade_count: 20,
            total_return_pct: 15.0,
            win_rate_pct: 55.0,
            sharpe: 1.5,
            max_drawdown_pct: -10.0,
            profit_factor: 1.8,
            total_fees: 40.0,
            avg_trade_return_pct: 0.7,
            avg_bars_held: 6.5,
            max_consecutive_losses: 3,
            exit_reasons: ExitCounts::default(),
        }
    }

    #[test]
    fn extract_each_metric() {
        let m = sample_metrics();
        assert_eq!(FitnessMetric::Sharpe.extract(&m), 1.5);
        assert_eq!(FitnessMetric::TotalReturn.extract(&m), 15.0);
        assert_eq!(FitnessMetric::WinRate.extract(&m), 55.0);
        assert_eq!(FitnessMetric::ProfitFactor.extract(&m), 1.8);
        assert_eq!(FitnessMetric::MaxDrawdown.extract(&m), -10.0);
    }

    #[test]
    fn default_is_sharpe() {
        assert_eq!(FitnessMetric::default(), FitnessMetric::Sharpe);
    }

    #[test]
    fn is_better_max_drawdown() {
        // -5% is better than -20% (less negative)
        assert!(FitnessMetric::MaxDrawdown.is_better(-5.0, -20.0));
        assert!(!FitnessMetric::MaxDrawdown.is_better(-20.0, -5.0));
    }

    #[test]
    fn snake_case_names() {
        let m: FitnessMetric = serde_json::from_str("\"total_return\"").unwrap();
        assert_eq!(m, FitnessMetric::TotalReturn);
    }
}
