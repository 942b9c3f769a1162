//! Strategy parameter variants and the rule factory.
//!
//! One fully-typed parameter struct per strategy family. The `kind` tag
//! selects the family when the config comes from TOML or JSON.

use serde::{Deserialize, Serialize};

use super::signal::{
    EnsembleParams, EnsembleRule, HybridParams, HybridRule, MeanReversionParams,
    MeanReversionRule, SignalRule, TrendParams, TrendRule,
};

/// Tagged union of strategy families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyParams {
    MeanReversion(MeanReversionParams),
    TrendFollowing(TrendParams),
    Hybrid(HybridParams),
    Ensemble(EnsembleParams),
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self::MeanReversion(MeanReversionParams::default())
    }
}

/// Family discriminant without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MeanReversion,
    TrendFollowing,
    Hybrid,
    Ensemble,
}

impl StrategyParams {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::MeanReversion(_) => StrategyKind::MeanReversion,
            Self::TrendFollowing(_) => StrategyKind::TrendFollowing,
            Self::Hybrid(_) => StrategyKind::Hybrid,
            Self::Ensemble(_) => StrategyKind::Ensemble,
        }
    }

    /// Build the rule for this family.
    pub fn build_rule(&self) -> Box<dyn SignalRule> {
        match self {
            Self::MeanReversion(p) => Box::new(MeanReversionRule::new(p.clone())),
            Self::TrendFollowing(p) => Box::new(TrendRule::new(p.clone())),
            Self::Hybrid(p) => Box::new(HybridRule::new(p.clone())),
            Self::Ensemble(p) => Box::new(EnsembleRule::new(p.clone())),
        }
    }
}
