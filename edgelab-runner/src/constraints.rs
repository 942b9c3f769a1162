//! Acceptance filter applied to every candidate before it can reach a leaderboard.

use serde::{Deserialize, Serialize};

use edgelab_core::domain::Trade;
use edgelab_core::engine::BacktestResult;

/// Criteria a backtest must meet to be ranked.
///
/// Default: at least 10 trades, no single winner above half of total winning
/// P&L, no drawdown floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_trades: usize,
    /// Largest winning trade's net P&L ÷ total winning net P&L.
    pub max_outlier_share: f64,
    /// Floor on max drawdown, in percent (e.g. `-30.0`).
    pub max_drawdown_pct: Option<f64>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_trades: 10,
            max_outlier_share: 0.5,
            max_drawdown_pct: None,
        }
    }
}

/// Why a candidate was not ranked.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    TooFewTrades { count: usize, min: usize },
    OutlierDominated { share: f64, max: f64 },
    DrawdownTooDeep { drawdown_pct: f64, floor: f64 },
    NonFiniteFitness,
    /// The sampled config failed validation and was never run.
    Invalid(String),
}

impl Constraints {
    pub fn check(&self, result: &BacktestResult) -> Result<(), Rejection> {
        let count = result.trades.len();
        if count < self.min_trades {
            return Err(Rejection::TooFewTrades {
                count,
                min: self.min_trades,
            });
        }
        if let Some(share) = outlier_share(&result.trades) {
            if share > self.max_outlier_share {
                return Err(Rejection::OutlierDominated {
                    share,
                    max: self.max_outlier_share,
                });
            }
        }
        if let Some(floor) = self.max_drawdown_pct {
            let drawdown_pct = result.metrics.max_drawdown_pct;
            if drawdown_pct < floor {
                return Err(Rejection::DrawdownTooDeep {
                    drawdown_pct,
                    floor,
                });
            }
        }
        Ok(())
    }
}

/// Share of winning P&L contributed by the single best trade.
///
/// `None` when there are no winners.
pub fn outlier_share(trades: &[Trade]) -> Option<f64> {
    let (total, largest) = trades
        .iter()
        .map(|t| t.net_pnl)
        .filter(|&p| p > 0.0)
        .fold((0.0_f64, 0.0_f64), |(sum, max), p| (sum + p, max.max(p)));
    (total > 0.0).then(|| largest / total)
}

/// Per-reason tally of rejected candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub too_few_trades: usize,
    pub outlier_dominated: usize,
    pub drawdown_too_deep: usize,
    pub non_finite_fitness: usize,
    pub invalid: usize,
}

impl RejectionCounts {
    pub fn record(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::TooFewTrades { .. } => self.too_few_trades += 1,
            Rejection::OutlierDominated { .. } => self.outlier_dominated += 1,
            Rejection::DrawdownTooDeep { .. } => self.drawdown_too_deep += 1,
            Rejection::NonFiniteFitness => self.non_finite_fitness += 1,
            Rejection::Invalid(_) => self.invalid += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.too_few_trades
            + self.outlier_dominated
            + self.drawdown_too_deep
            + self.non_finite_fitness
            + self.invalid
    }

    pub fn merge(&mut self, other: &RejectionCounts) {
        self.too_few_trades += other.too_few_trades;
        self.outlier_dominated += other.outlier_dominated;
        self.drawdown_too_deep += other.drawdown_too_deep;
        self.non_finite_fitness += other.non_finite_fitness;
        self.invalid += other.invalid;
    }
}
