//! Mean reversion: buy oversold momentum, sell when it recovers.
//!
//! Entry: rsi[t-1] < entry_threshold.
//! Exit: rsi[t-1] > exit_threshold.

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::domain::{EntryKind, Position};
use crate::indicators::Rsi;

use super::{DecisionContext, SignalRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReversionParams {
    pub rsi_period: usize,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
}

impl Default for MeanReversionParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            entry_threshold: 30.0,
            exit_threshold: 55.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeanReversionRule {
    pub params: MeanReversionParams,
    rsi_key: String,
}

impl MeanReversionRule {
    pub fn new(params: MeanReversionParams) -> Self {
        let rsi_key = Rsi::key(params.rsi_period);
        Self { params, rsi_key }
    }

    fn rsi(&self, ctx: &DecisionContext<'_>, i: usize) -> Option<f64> {
        ctx.indicators.ready(&self.rsi_key, i)
    }
}

impl SignalRule for MeanReversionRule {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Rsi::new(self.params.rsi_period))]
    }

    fn entry(&self, ctx: &DecisionContext<'_>, decision_index: usize) -> Option<EntryKind> {
        let rsi = self.rsi(ctx, decision_index)?;
        (rsi < self.params.entry_threshold).then_some(EntryKind::MeanReversion)
    }

    fn exit(&self, ctx: &DecisionContext<'_>, decision_index: usize, _position: &Position) -> bool {
        self.rsi(ctx, decision_index)
            .is_some_and(|rsi| rsi > self.params.exit_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::IndicatorValues;
    use crate::components::signal::test_support::{context_for, open_position};

    fn rule() -> MeanReversionRule {
        MeanReversionRule::new(MeanReversionParams {
            rsi_period: 3,
            entry_threshold: 30.0,
            exit_threshold: 70.0,
        })
    }

    #[test]
    fn enters_after_selloff() {
        let closes = [100.0, 99.0, 98.0, 97.0, 96.0];
        let rule = rule();
        let mut iv = IndicatorValues::new();
        let ctx = context_for(&rule, &closes, &mut iv);
        assert_eq!(rule.entry(&ctx, 4), Some(EntryKind::MeanReversion));
    }

    #[test]
    fn no_entry_during_warmup() {
        let closes = [100.0, 99.0, 98.0, 97.0, 96.0];
        let rule = rule();
        let mut iv = IndicatorValues::new();
        let ctx = context_for(&rule, &closes, &mut iv);
        // rsi_3 undefined before index 3
        assert_eq!(rule.entry(&ctx, 2), None);
    }

    #[test]
    fn exits_after_rally() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0];
        let rule = rule();
        let mut iv = IndicatorValues::new();
        let ctx = context_for(&rule, &closes, &mut iv);
        let pos = open_position(EntryKind::MeanReversion);
        assert!(rule.exit(&ctx, 4, &pos));
        assert_eq!(rule.entry(&ctx, 4), None);
    }
}
