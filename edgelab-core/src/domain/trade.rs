//! Trade: a completed round trip, entry → exit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::position::EntryKind;

/// Why a position was closed. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The rule's exit condition fired on the previous bar's indicators.
    Signal,
    /// Bars held reached the configured maximum.
    MaxHold,
    /// The bar's time reached the end-of-day cutoff.
    EndOfDay,
    /// Series ran out with the position still open.
    EndOfData,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signal => "signal",
            Self::MaxHold => "max_hold",
            Self::EndOfDay => "end_of_day",
            Self::EndOfData => "end_of_data",
        }
    }
}

/// Immutable ledger row written when a position closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_bar: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_bar: usize,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    // ── Size ──
    pub quantity: u64,

    // ── PnL ──
    pub gross_pnl: f64,
    /// Entry fee + exit fee.
    pub fees: f64,
    pub net_pnl: f64,

    pub bars_held: usize,
    pub kind: EntryKind,

    /// Capital after this trade settled.
    pub capital_after: f64,
}

impl Trade {
    /// Net return as a percentage of the entry cost basis.
    pub fn return_pct(&self) -> f64 {
        let basis = self.entry_price * self.quantity as f64;
        if basis == 0.0 {
            return 0.0;
        }
        self.net_pnl / basis * 100.0
    }

    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }
}
