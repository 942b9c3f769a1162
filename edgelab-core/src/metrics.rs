//! Performance metrics: pure functions over the trade ledger.
//!
//! Every metric is computed once at end of run from the closed trades and the
//! initial capital. No dependency on the bar loop.
//!
//! Sharpe is trade-level: mean / std of per-trade returns, scaled by an
//! annualization factor chosen through `SharpeScaling`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{ExitReason, Trade};

/// Cap on the trades-per-year factor.
pub const MAX_TRADES_PER_YEAR: f64 = 252.0;

/// How per-trade Sharpe is annualized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SharpeScaling {
    /// Multiply by √252.
    #[default]
    Sqrt252,
    /// Multiply by √min(n, 252) for an assumed n trades per year.
    TradesPerYear(f64),
    /// Estimate trades per year from the ledger's time span, capped at 252.
    Observed,
}

impl SharpeScaling {
    pub fn multiplier(&self, trades: &[Trade]) -> f64 {
        match *self {
            SharpeScaling::Sqrt252 => MAX_TRADES_PER_YEAR.sqrt(),
            SharpeScaling::TradesPerYear(n) => n.clamp(0.0, MAX_TRADES_PER_YEAR).sqrt(),
            SharpeScaling::Observed => match observed_trades_per_year(trades) {
                Some(n) => n.min(MAX_TRADES_PER_YEAR).sqrt(),
                None => MAX_TRADES_PER_YEAR.sqrt(),
            },
        }
    }
}

/// Count of trades per exit reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitCounts {
    pub signal: usize,
    pub max_hold: usize,
    pub end_of_day: usize,
    pub end_of_data: usize,
}

impl ExitCounts {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut counts = Self::default();
        for trade in trades {
            match trade.exit_reason {
                ExitReason::Signal => counts.signal += 1,
                ExitReason::MaxHold => counts.max_hold += 1,
                ExitReason::EndOfDay => counts.end_of_day += 1,
                ExitReason::EndOfData => counts.end_of_data += 1,
            }
        }
        counts
    }

    pub fn get(&self, reason: ExitReason) -> usize {
        match reason {
            ExitReason::Signal => self.signal,
            ExitReason::MaxHold => self.max_hold,
            ExitReason::EndOfDay => self.end_of_day,
            ExitReason::EndOfData => self.end_of_data,
        }
    }
}

/// Summary of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub trade_count: usize,
    pub total_return_pct: f64,
    pub win_rate_pct: f64,
    pub sharpe: f64,
    /// Non-positive, e.g. -12.5 for a 12.5% drawdown.
    pub max_drawdown_pct: f64,
    pub profit_factor: f64,
    pub total_fees: f64,
    pub avg_trade_return_pct: f64,
    pub avg_bars_held: f64,
    pub max_consecutive_losses: usize,
    pub exit_reasons: ExitCounts,
}

impl Metrics {
    /// Compute all metrics from the ledger.
    pub fn compute(trades: &[Trade], initial_capital: f64, scaling: SharpeScaling) -> Self {
        let final_capital = trades
            .last()
            .map(|t| t.capital_after)
            .unwrap_or(initial_capital);
        let returns = trade_returns(trades);
        Self {
            trade_count: trades.len(),
            total_return_pct: total_return_pct(initial_capital, final_capital),
            win_rate_pct: win_rate_pct(trades),
            sharpe: sharpe_ratio(&returns, scaling.multiplier(trades)),
            max_drawdown_pct: max_drawdown_pct(&capital_curve(trades, initial_capital)),
            profit_factor: profit_factor(trades),
            total_fees: trades.iter().map(|t| t.fees).sum(),
            avg_trade_return_pct: mean_f64(&returns),
            avg_bars_held: avg_bars_held(trades),
            max_consecutive_losses: max_consecutive_losses(trades),
            exit_reasons: ExitCounts::from_trades(trades),
        }
    }

    /// Neutral summary for a run without trades.
    pub fn empty() -> Self {
        Self::compute(&[], 1.0, SharpeScaling::default())
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// (final - initial) / initial × 100.
pub fn total_return_pct(initial_capital: f64, final_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_capital - initial_capital) / initial_capital * 100.0
}

/// Percentage of trades with positive net P&L. 0 with no trades.
pub fn win_rate_pct(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Per-trade net return percentages, in ledger order.
pub fn trade_returns(trades: &[Trade]) -> Vec<f64> {
    trades.iter().map(Trade::return_pct).collect()
}

/// mean / sample std × multiplier.
///
/// Returns 0.0 with fewer than 2 returns or zero spread.
pub fn sharpe_ratio(returns: &[f64], multiplier: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(returns);
    if std < 1e-12 {
        return 0.0;
    }
    mean_f64(returns) / std * multiplier
}

/// Capital after each close, starting with the initial capital.
pub fn capital_curve(trades: &[Trade], initial_capital: f64) -> Vec<f64> {
    std::iter::once(initial_capital)
        .chain(trades.iter().map(|t| t.capital_after))
        .collect()
}

/// Worst (capital - running peak) / running peak × 100. Zero or negative.
pub fn max_drawdown_pct(curve: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for &c in curve {
        if c > peak {
            peak = c;
        }
        if peak > 0.0 {
            let dd = (c - peak) / peak * 100.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Gross profits / gross losses, capped at 100.0 (all winners).
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_profit: f64 = trades
        .iter()
        .filter(|t| t.net_pnl > 0.0)
        .map(|t| t.net_pnl)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.net_pnl < 0.0)
        .map(|t| t.net_pnl.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

pub fn avg_bars_held(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.bars_held).sum::<usize>() as f64 / trades.len() as f64
}

/// Longest run of non-winning trades.
pub fn max_consecutive_losses(trades: &[Trade]) -> usize {
    let mut max_streak = 0;
    let mut current = 0;
    for trade in trades {
        if trade.is_winner() {
            current = 0;
        } else {
            current += 1;
            max_streak = max_streak.max(current);
        }
    }
    max_streak
}

/// Trades per year over the span first entry → last exit.
///
/// `None` when there are no trades or the span is empty.
pub fn observed_trades_per_year(trades: &[Trade]) -> Option<f64> {
    let first: NaiveDateTime = trades.first()?.entry_time;
    let last: NaiveDateTime = trades.last()?.exit_time;
    let seconds = (last - first).num_seconds();
    if seconds <= 0 {
        return None;
    }
    let years = seconds as f64 / (365.25 * 86_400.0);
    Some(trades.len() as f64 / years)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use chrono::{Duration, NaiveDate};

    fn make_trade(net_pnl: f64, capital_after: f64) -> Trade {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Trade {
            entry_bar: 0,
            entry_time: ts,
            entry_price: 100.0,
            exit_bar: 5,
            exit_time: ts + Duration::hours(5),
            exit_price: 100.0 + net_pnl / 10.0,
            exit_reason: ExitReason::Signal,
            quantity: 10,
            gross_pnl: net_pnl,
            fees: 0.0,
            net_pnl,
            bars_held: 5,
            kind: EntryKind::MeanReversion,
            capital_after,
        }
    }

    fn ledger(pnls: &[f64], initial: f64) -> Vec<Trade> {
        let mut capital = initial;
        pnls.iter()
            .map(|&p| {
                capital += p;
                make_trade(p, capital)
            })
            .collect()
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_single_trade_is_zero() {
        assert_eq!(sharpe_ratio(&[3.0], 252f64.sqrt()), 0.0);
    }

    #[test]
    fn sharpe_identical_returns_is_zero() {
        assert_eq!(sharpe_ratio(&[1.0, 1.0, 1.0], 252f64.sqrt()), 0.0);
    }

    #[test]
    fn sharpe_known_value() {
        // returns 1, 3: mean 2, sample std sqrt(2)
        let s = sharpe_ratio(&[1.0, 3.0], 1.0);
        assert!((s - 2.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sharpe_scaling_multipliers() {
        let trades = ledger(&[10.0, -5.0], 1_000.0);
        assert!((SharpeScaling::Sqrt252.multiplier(&trades) - 252f64.sqrt()).abs() < 1e-12);
        assert!((SharpeScaling::TradesPerYear(100.0).multiplier(&trades) - 10.0).abs() < 1e-12);
        // capped at 252
        assert!(
            (SharpeScaling::TradesPerYear(10_000.0).multiplier(&trades) - 252f64.sqrt()).abs()
                < 1e-12
        );
        // two trades inside five hours → far more than 252/year → capped
        assert!((SharpeScaling::Observed.multiplier(&trades) - 252f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn observed_rate_over_a_year() {
        let mut trades = ledger(&[1.0, 2.0], 1_000.0);
        trades[1].exit_time = trades[0].entry_time + Duration::days(365) + Duration::hours(6);
        let rate = observed_trades_per_year(&trades).unwrap();
        assert!((rate - 2.0).abs() < 0.01);
        assert!((SharpeScaling::Observed.multiplier(&trades) - rate.sqrt()).abs() < 1e-12);
    }

    // ── Drawdown ──

    #[test]
    fn max_drawdown_known() {
        let curve = [100_000.0, 110_000.0, 90_000.0, 95_000.0];
        let expected = (90_000.0 - 110_000.0) / 110_000.0 * 100.0;
        assert!((max_drawdown_pct(&curve) - expected).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_monotonic_increase() {
        let curve: Vec<f64> = (0..10).map(|i| 1_000.0 + i as f64).collect();
        assert_eq!(max_drawdown_pct(&curve), 0.0);
    }

    #[test]
    fn max_drawdown_first_trade_loses() {
        // The initial capital is the first peak
        let trades = ledger(&[-100.0], 1_000.0);
        let curve = capital_curve(&trades, 1_000.0);
        assert!((max_drawdown_pct(&curve) + 10.0).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_empty() {
        assert_eq!(max_drawdown_pct(&[]), 0.0);
    }

    // ── Win rate / profit factor ──

    #[test]
    fn win_rate_mixed() {
        let trades = ledger(&[500.0, -200.0, 300.0, -100.0], 10_000.0);
        assert!((win_rate_pct(&trades) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn breakeven_is_not_a_win() {
        let trades = ledger(&[0.0, 10.0], 10_000.0);
        assert!((win_rate_pct(&trades) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn profit_factor_mixed() {
        let trades = ledger(&[500.0, -200.0, 300.0], 10_000.0);
        assert!((profit_factor(&trades) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn profit_factor_all_winners_capped() {
        let trades = ledger(&[500.0, 300.0], 10_000.0);
        assert_eq!(profit_factor(&trades), 100.0);
    }

    #[test]
    fn consecutive_losses() {
        let trades = ledger(&[100.0, -200.0, -300.0, -100.0, 200.0], 10_000.0);
        assert_eq!(max_consecutive_losses(&trades), 3);
    }

    // ── Aggregate ──

    #[test]
    fn compute_no_trades_is_neutral() {
        let m = Metrics::compute(&[], 100_000.0, SharpeScaling::Sqrt252);
        assert_eq!(m.trade_count, 0);
        assert_eq!(m.total_return_pct, 0.0);
        assert_eq!(m.win_rate_pct, 0.0);
        assert_eq!(m.sharpe, 0.0);
        assert_eq!(m.max_drawdown_pct, 0.0);
        assert!(m.sharpe.is_finite());
        assert_eq!(m, Metrics::empty());
    }

    #[test]
    fn compute_with_trades() {
        let trades = ledger(&[500.0, -200.0, 300.0], 10_000.0);
        let m = Metrics::compute(&trades, 10_000.0, SharpeScaling::Sqrt252);
        assert_eq!(m.trade_count, 3);
        assert!((m.total_return_pct - 6.0).abs() < 1e-10);
        assert!((m.win_rate_pct - 200.0 / 3.0).abs() < 1e-10);
        assert!(m.sharpe > 0.0);
        assert!(m.max_drawdown_pct < 0.0);
        assert_eq!(m.exit_reasons.get(ExitReason::Signal), 3);
        assert_eq!(m.avg_bars_held, 5.0);
    }
}
