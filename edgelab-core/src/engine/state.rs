//! Mutable engine state and the run result type.

use serde::{Deserialize, Serialize};

use crate::domain::{EntryKind, ExitReason, Position, PriceBar, Trade};
use crate::metrics::Metrics;

/// State that evolves bar-by-bar during the loop.
///
/// `capital` is cash: debited by `qty × price + fee` on entry, credited by
/// `qty × price − fee` on exit. The single `Option<Position>` slot is what
/// makes overlapping positions unrepresentable.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub capital: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
}

impl EngineState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            capital: initial_capital,
            position: None,
            trades: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Open the slot at `bar.close`. The caller guarantees the engine is flat
    /// and `quantity >= 1`.
    pub fn open(&mut self, bar_index: usize, bar: &PriceBar, quantity: u64, fee: f64, kind: EntryKind) {
        debug_assert!(self.is_flat(), "open called while in position");
        let pos = Position::open(bar_index, bar.timestamp, bar.close, quantity, fee, kind);
        self.capital -= pos.cost_basis() + fee;
        self.position = Some(pos);
    }

    /// Close the slot at `bar.close` and append the trade to the ledger.
    ///
    /// Returns `None` if the engine was already flat.
    pub fn close(
        &mut self,
        bar_index: usize,
        bar: &PriceBar,
        reason: ExitReason,
        fee: f64,
    ) -> Option<&Trade> {
        let pos = self.position.take()?;
        self.capital += pos.market_value(bar.close) - fee;

        let gross_pnl = pos.unrealized_pnl(bar.close);
        let fees = pos.entry_fee + fee;
        self.trades.push(Trade {
            entry_bar: pos.entry_bar,
            entry_time: pos.entry_time,
            entry_price: pos.entry_price,
            exit_bar: bar_index,
            exit_time: bar.timestamp,
            exit_price: bar.close,
            exit_reason: reason,
            quantity: pos.quantity,
            gross_pnl,
            fees,
            net_pnl: gross_pnl - fees,
            bars_held: pos.bars_held,
            kind: pos.kind,
            capital_after: self.capital,
        });
        self.trades.last()
    }

    /// Cash plus the open position marked at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        match &self.position {
            Some(pos) => self.capital + pos.market_value(price),
            None => self.capital,
        }
    }
}

/// Result of a complete backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Completed trades in close order.
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
    /// Mark-to-market capital at each bar close, one entry per input bar.
    pub capital_curve: Vec<f64>,
    pub final_capital: f64,
    /// Longest indicator lookback of the run.
    pub warmup_bars: usize,
}
