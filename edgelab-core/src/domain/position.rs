//! Position: the single open-trade slot.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which rule opened a position.
///
/// Hybrid and ensemble strategies use it to pick the matching exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    MeanReversion,
    Trend,
    Vote,
}

/// Open long position. Created on entry, converted into a `Trade` on exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_bar: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub quantity: u64,
    pub entry_fee: f64,
    pub bars_held: usize,
    pub kind: EntryKind,
}

impl Position {
    pub fn open(
        entry_bar: usize,
        entry_time: NaiveDateTime,
        entry_price: f64,
        quantity: u64,
        entry_fee: f64,
        kind: EntryKind,
    ) -> Self {
        Self {
            entry_bar,
            entry_time,
            entry_price,
            quantity,
            entry_fee,
            bars_held: 0,
            kind,
        }
    }

    /// Advance one bar.
    pub fn tick_bar(&mut self) {
        self.bars_held += 1;
    }

    /// Cash spent to open: quantity × price (fee excluded).
    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.entry_price
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Position {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Position::open(5, ts, 100.0, 10, 1.0, EntryKind::MeanReversion)
    }

    #[test]
    fn opens_with_zero_bars_held() {
        let mut pos = sample();
        assert_eq!(pos.bars_held, 0);
        pos.tick_bar();
        pos.tick_bar();
        assert_eq!(pos.bars_held, 2);
    }

    #[test]
    fn valuation() {
        let pos = sample();
        assert_eq!(pos.cost_basis(), 1000.0);
        assert_eq!(pos.market_value(110.0), 1100.0);
        assert_eq!(pos.unrealized_pnl(95.0), -50.0);
    }
}
