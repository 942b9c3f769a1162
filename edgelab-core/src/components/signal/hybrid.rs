//! Hybrid: switch between mean reversion and trend following by regime.
//!
//! The efficiency ratio at t-1 classifies the bar: a mean-reverting regime
//! defers to the mean-reversion rule, a trending regime to the trend rule,
//! and a mixed regime never enters. An open position exits on the rule that
//! opened it, whatever the regime is now.

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::domain::{EntryKind, Position};
use crate::indicators::{classify_regime, EfficiencyRatio, Regime};

use super::{
    DecisionContext, MeanReversionParams, MeanReversionRule, SignalRule, TrendParams, TrendRule,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridParams {
    pub er_period: usize,
    pub mr_threshold: f64,
    pub trend_threshold: f64,
    pub mean_reversion: MeanReversionParams,
    pub trend: TrendParams,
}

impl Default for HybridParams {
    fn default() -> Self {
        Self {
            er_period: 20,
            mr_threshold: 0.3,
            trend_threshold: 0.6,
            mean_reversion: MeanReversionParams::default(),
            trend: TrendParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HybridRule {
    er_period: usize,
    mr_threshold: f64,
    trend_threshold: f64,
    er_key: String,
    mean_reversion: MeanReversionRule,
    trend: TrendRule,
}

impl HybridRule {
    pub fn new(params: HybridParams) -> Self {
        Self {
            er_period: params.er_period,
            mr_threshold: params.mr_threshold,
            trend_threshold: params.trend_threshold,
            er_key: EfficiencyRatio::key(params.er_period),
            mean_reversion: MeanReversionRule::new(params.mean_reversion),
            trend: TrendRule::new(params.trend),
        }
    }

    /// Regime at a decision index, `None` during warmup.
    pub fn regime(&self, ctx: &DecisionContext<'_>, i: usize) -> Option<Regime> {
        let er = ctx.indicators.ready(&self.er_key, i)?;
        classify_regime(er, self.mr_threshold, self.trend_threshold)
    }
}

impl SignalRule for HybridRule {
    fn name(&self) -> &str {
        "hybrid"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        let mut out: Vec<Box<dyn Indicator>> = vec![Box::new(EfficiencyRatio::new(self.er_period))];
        out.extend(self.mean_reversion.indicators());
        out.extend(self.trend.indicators());
        out
    }

    fn entry(&self, ctx: &DecisionContext<'_>, decision_index: usize) -> Option<EntryKind> {
        match self.regime(ctx, decision_index)? {
            Regime::MeanReversion => self.mean_reversion.entry(ctx, decision_index),
            Regime::Trending => self.trend.entry(ctx, decision_index),
            Regime::Mixed => None,
        }
    }

    fn exit(&self, ctx: &DecisionContext<'_>, decision_index: usize, position: &Position) -> bool {
        match position.kind {
            EntryKind::Trend => self.trend.exit(ctx, decision_index, position),
            EntryKind::MeanReversion | EntryKind::Vote => {
                self.mean_reversion.exit(ctx, decision_index, position)
            }
        }
    }
}
