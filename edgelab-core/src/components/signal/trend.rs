//! Trend following: ride a fast EMA above a slow EMA with momentum confirmation.
//!
//! Entry: ema_fast[t-1] > ema_slow[t-1] and rsi[t-1] > pulse_threshold.
//! Exit: close[t-1] < ema_slow[t-1].

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::domain::{EntryKind, Position};
use crate::indicators::{Ema, Rsi};

use super::{DecisionContext, SignalRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub pulse_period: usize,
    pub pulse_threshold: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 48,
            pulse_period: 14,
            pulse_threshold: 55.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendRule {
    pub params: TrendParams,
    fast_key: String,
    slow_key: String,
    pulse_key: String,
}

impl TrendRule {
    pub fn new(params: TrendParams) -> Self {
        Self {
            fast_key: Ema::key(params.fast_period),
            slow_key: Ema::key(params.slow_period),
            pulse_key: Rsi::key(params.pulse_period),
            params,
        }
    }
}

impl SignalRule for TrendRule {
    fn name(&self) -> &str {
        "trend_following"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Ema::new(self.params.fast_period)),
            Box::new(Ema::new(self.params.slow_period)),
            Box::new(Rsi::new(self.params.pulse_period)),
        ]
    }

    fn entry(&self, ctx: &DecisionContext<'_>, decision_index: usize) -> Option<EntryKind> {
        let iv = ctx.indicators;
        let fast = iv.ready(&self.fast_key, decision_index)?;
        let slow = iv.ready(&self.slow_key, decision_index)?;
        let pulse = iv.ready(&self.pulse_key, decision_index)?;
        (fast > slow && pulse > self.params.pulse_threshold).then_some(EntryKind::Trend)
    }

    fn exit(&self, ctx: &DecisionContext<'_>, decision_index: usize, _position: &Position) -> bool {
        match (
            ctx.close(decision_index),
            ctx.indicators.ready(&self.slow_key, decision_index),
        ) {
            (Some(close), Some(slow)) => close < slow,
            _ => false,
        }
    }
}
