//! PriceBar: the fundamental market data unit.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One row of the input series: a timestamp and a close.
///
/// The close is the only price the engine knows about. Sources that carry
/// open/high/low/volume drop them when building `PriceBar`s, so no rule can
/// read them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

impl PriceBar {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        Self { timestamp, close }
    }

    /// Hour of day, 0–23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Wall-clock time of the bar.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Returns true if the close is unusable (NaN or non-positive).
    pub fn is_void(&self) -> bool {
        self.close.is_nan() || self.close <= 0.0
    }
}

/// Extract the close column.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
