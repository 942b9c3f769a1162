//! Position sizing: how much of current capital an entry may use.
//!
//! The engine turns the fraction into a whole quantity:
//! `floor((capital × fraction − fee) / close)`.

use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Sizing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sizing {
    /// Fixed fraction of capital, in (0, 1].
    Fraction { fraction: f64 },

    /// Kelly criterion from the run's own closed trades.
    ///
    /// `k = W − (1 − W) / R` with W the win rate and R the ratio of average
    /// win to average loss. The fraction used is `clamp(k × scale, 0, cap)`.
    /// Until `min_trades` trades have closed, `fallback` is used instead.
    Kelly {
        scale: f64,
        cap: f64,
        min_trades: usize,
        fallback: f64,
    },
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Fraction { fraction: 0.95 }
    }
}

impl Sizing {
    /// Fraction of capital for the next entry, given the ledger so far.
    pub fn fraction(&self, ledger: &[Trade]) -> f64 {
        match *self {
            Sizing::Fraction { fraction } => fraction,
            Sizing::Kelly {
                scale,
                cap,
                min_trades,
                fallback,
            } => {
                if ledger.len() < min_trades.max(1) {
                    return fallback;
                }
                (kelly_fraction(ledger) * scale).clamp(0.0, cap)
            }
        }
    }
}

/// Raw Kelly fraction. May be negative (no edge).
pub fn kelly_fraction(ledger: &[Trade]) -> f64 {
    if ledger.is_empty() {
        return 0.0;
    }
    let (wins, losses): (Vec<f64>, Vec<f64>) = ledger
        .iter()
        .map(|t| t.net_pnl)
        .partition(|&pnl| pnl > 0.0);

    let win_rate = wins.len() as f64 / ledger.len() as f64;
    let losses: Vec<f64> = losses.into_iter().filter(|&l| l < 0.0).collect();
    if losses.is_empty() {
        // nothing lost yet: payoff ratio is unbounded
        return win_rate;
    }
    if wins.is_empty() {
        return -1.0;
    }
    let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
    let avg_loss = -losses.iter().sum::<f64>() / losses.len() as f64;
    let payoff = avg_win / avg_loss;
    win_rate - (1.0 - win_rate) / payoff
}
