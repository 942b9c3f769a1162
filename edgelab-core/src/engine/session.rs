//! Intraday session rules: which bars may open a position and when open
//! positions must be flattened.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRules {
    /// Hours (0-23) in which entries are allowed. Empty means any hour.
    #[serde(default)]
    pub allowed_entry_hours: BTreeSet<u32>,
    /// No entries at or after this time of day.
    #[serde(default)]
    pub late_entry_cutoff: Option<NaiveTime>,
    /// Positions still open at or after this time of day are closed.
    #[serde(default)]
    pub eod_cutoff: Option<NaiveTime>,
}

impl SessionRules {
    /// No restrictions at all.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn with_hours(mut self, hours: impl IntoIterator<Item = u32>) -> Self {
        self.allowed_entry_hours = hours.into_iter().collect();
        self
    }

    pub fn with_late_entry_cutoff(mut self, cutoff: NaiveTime) -> Self {
        self.late_entry_cutoff = Some(cutoff);
        self
    }

    pub fn with_eod_cutoff(mut self, cutoff: NaiveTime) -> Self {
        self.eod_cutoff = Some(cutoff);
        self
    }

    /// True if a position may be opened on this bar.
    ///
    /// Never at or after the end-of-day cutoff: an entry is not checked for
    /// exit on its own bar, so it would otherwise be carried overnight.
    pub fn entry_allowed(&self, bar: &PriceBar) -> bool {
        if !self.allowed_entry_hours.is_empty() && !self.allowed_entry_hours.contains(&bar.hour())
        {
            return false;
        }
        if self.is_end_of_day(bar) {
            return false;
        }
        match self.late_entry_cutoff {
            Some(cutoff) => bar.time() < cutoff,
            None => true,
        }
    }

    /// True if an open position must be closed on this bar.
    pub fn is_end_of_day(&self, bar: &PriceBar) -> bool {
        self.eod_cutoff.is_some_and(|cutoff| bar.time() >= cutoff)
    }
}
