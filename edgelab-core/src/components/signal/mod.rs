//! Entry/exit rules: one per strategy family.
//!
//! Rules are portfolio-agnostic: they see the close series and precomputed
//! indicators, never capital. The engine always calls them with the index of
//! the *previous* bar, so a rule cannot read the close of the bar it trades on.

pub mod ensemble;
pub mod hybrid;
pub mod mean_reversion;
pub mod trend;

pub use ensemble::{EnsembleParams, EnsembleRule, Voter};
pub use hybrid::{HybridParams, HybridRule};
pub use mean_reversion::{MeanReversionParams, MeanReversionRule};
pub use trend::{TrendParams, TrendRule};

use crate::components::indicator::{Indicator, IndicatorValues};
use crate::domain::{EntryKind, Position};

/// What a rule may look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub closes: &'a [f64],
    pub indicators: &'a IndicatorValues,
}

impl<'a> DecisionContext<'a> {
    pub fn new(closes: &'a [f64], indicators: &'a IndicatorValues) -> Self {
        Self { closes, indicators }
    }

    /// Close at `i`, if present and usable.
    pub fn close(&self, i: usize) -> Option<f64> {
        self.closes.get(i).copied().filter(|c| !c.is_nan())
    }
}

/// Trait for strategy rules.
///
/// # Architecture invariant
/// `decision_index` is always `t - 1` for a bar `t`. Implementations must only
/// read indicator values at `decision_index` (or earlier) and must return
/// "no signal" when any of them is still in warmup.
pub trait SignalRule: Send + Sync + std::fmt::Debug {
    /// Human-readable name (e.g., "mean_reversion").
    fn name(&self) -> &str;

    /// Indicators this rule reads. Precomputed before the loop.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// `Some(kind)` if the rule wants to open a long at the next bar.
    fn entry(&self, ctx: &DecisionContext<'_>, decision_index: usize) -> Option<EntryKind>;

    /// True if the rule wants the open position closed.
    fn exit(&self, ctx: &DecisionContext<'_>, decision_index: usize, position: &Position) -> bool;
}
