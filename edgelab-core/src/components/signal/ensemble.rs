//! Ensemble voting: three independent oversold voters and a vote count.
//!
//! Each voter reads one close-derived indicator at t-1. It votes to enter
//! when the value is below its `enter_below` level and to exit when it is
//! above its `exit_above` level. The rule acts when at least `min_votes`
//! voters agree. Any voter still in warmup blocks the decision.

use serde::{Deserialize, Serialize};

use crate::components::indicator::Indicator;
use crate::domain::{EntryKind, Position};
use crate::indicators::{Roc, Rsi, ZScore};

use super::{DecisionContext, SignalRule};

/// Number of voters in an ensemble.
pub const VOTERS: usize = 3;

/// One independent signal evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "indicator", rename_all = "snake_case")]
pub enum Voter {
    Rsi {
        period: usize,
        enter_below: f64,
        exit_above: f64,
    },
    ZScore {
        period: usize,
        enter_below: f64,
        exit_above: f64,
    },
    Roc {
        period: usize,
        enter_below: f64,
        exit_above: f64,
    },
}

impl Voter {
    pub fn indicator(&self) -> Box<dyn Indicator> {
        match *self {
            Voter::Rsi { period, .. } => Box::new(Rsi::new(period)),
            Voter::ZScore { period, .. } => Box::new(ZScore::new(period)),
            Voter::Roc { period, .. } => Box::new(Roc::new(period)),
        }
    }

    pub fn key(&self) -> String {
        match *self {
            Voter::Rsi { period, .. } => Rsi::key(period),
            Voter::ZScore { period, .. } => ZScore::key(period),
            Voter::Roc { period, .. } => Roc::key(period),
        }
    }

    pub fn period(&self) -> usize {
        match *self {
            Voter::Rsi { period, .. } | Voter::ZScore { period, .. } | Voter::Roc { period, .. } => {
                period
            }
        }
    }

    fn levels(&self) -> (f64, f64) {
        match *self {
            Voter::Rsi {
                enter_below,
                exit_above,
                ..
            }
            | Voter::ZScore {
                enter_below,
                exit_above,
                ..
            }
            | Voter::Roc {
                enter_below,
                exit_above,
                ..
            } => (enter_below, exit_above),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleParams {
    pub voters: [Voter; VOTERS],
    pub min_votes: usize,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            voters: [
                Voter::Rsi {
                    period: 14,
                    enter_below: 35.0,
                    exit_above: 55.0,
                },
                Voter::ZScore {
                    period: 20,
                    enter_below: -1.5,
                    exit_above: 0.0,
                },
                Voter::Roc {
                    period: 5,
                    enter_below: -2.0,
                    exit_above: 1.0,
                },
            ],
            min_votes: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnsembleRule {
    pub params: EnsembleParams,
    keys: [String; VOTERS],
}

impl EnsembleRule {
    pub fn new(params: EnsembleParams) -> Self {
        let keys = [
            params.voters[0].key(),
            params.voters[1].key(),
            params.voters[2].key(),
        ];
        Self { params, keys }
    }

    /// Indicator values for every voter, `None` if any is in warmup.
    fn readings(&self, ctx: &DecisionContext<'_>, i: usize) -> Option<[f64; VOTERS]> {
        let mut out = [0.0; VOTERS];
        for (slot, key) in out.iter_mut().zip(&self.keys) {
            *slot = ctx.indicators.ready(key, i)?;
        }
        Some(out)
    }

    /// (entry votes, exit votes) at a decision index.
    pub fn tally(&self, ctx: &DecisionContext<'_>, i: usize) -> Option<(usize, usize)> {
        let readings = self.readings(ctx, i)?;
        let mut enter = 0;
        let mut exit = 0;
        for (voter, value) in self.params.voters.iter().zip(readings) {
            let (enter_below, exit_above) = voter.levels();
            if value < enter_below {
                enter += 1;
            }
            if value > exit_above {
                exit += 1;
            }
        }
        Some((enter, exit))
    }
}

impl SignalRule for EnsembleRule {
    fn name(&self) -> &str {
        "ensemble"
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        self.params.voters.iter().map(Voter::indicator).collect()
    }

    fn entry(&self, ctx: &DecisionContext<'_>, decision_index: usize) -> Option<EntryKind> {
        let (enter, _) = self.tally(ctx, decision_index)?;
        (enter >= self.params.min_votes).then_some(EntryKind::Vote)
    }

    fn exit(&self, ctx: &DecisionContext<'_>, decision_index: usize, _position: &Position) -> bool {
        self.tally(ctx, decision_index)
            .is_some_and(|(_, exit)| exit >= self.params.min_votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::IndicatorValues;
    use crate::components::signal::test_support::{context_for, open_position};

    fn rule(min_votes: usize) -> EnsembleRule {
        EnsembleRule::new(EnsembleParams {
            voters: [
                Voter::Rsi {
                    period: 3,
                    enter_below: 30.0,
                    exit_above: 70.0,
                },
                Voter::ZScore {
                    period: 4,
                    enter_below: -1.0,
                    exit_above: 1.0,
                },
                Voter::Roc {
                    period: 2,
                    enter_below: -1.0,
                    exit_above: 1.0,
                },
            ],
            min_votes,
        })
    }

    #[test]
    fn unanimous_selloff_enters() {
        let closes = [100.0, 100.0, 100.0, 100.0, 97.0, 94.0];
        let rule = rule(3);
        let mut iv = IndicatorValues::new();
        let ctx = context_for(&rule, &closes, &mut iv);
        assert_eq!(rule.tally(&ctx, 5), Some((3, 0)));
        assert_eq!(rule.entry(&ctx, 5), Some(EntryKind::Vote));
    }

    #[test]
    fn rally_votes_exit() {
        let closes = [100.0, 100.0, 100.0, 100.0, 103.0, 106.0];
        let rule = rule(2);
        let mut iv = IndicatorValues::new();
        let ctx = context_for(&rule, &closes, &mut iv);
        assert_eq!(rule.entry(&ctx, 5), None);
        assert!(rule.exit(&ctx, 5, &open_position(EntryKind::Vote)));
    }

    #[test]
    fn warmup_blocks_vote() {
        let closes = [100.0, 99.0, 98.0];
        let rule = rule(1);
        let mut iv = IndicatorValues::new();
        let ctx = context_for(&rule, &closes, &mut iv);
        assert_eq!(rule.tally(&ctx, 2), None);
        assert!(!rule.exit(&ctx, 2, &open_position(EntryKind::Vote)));
    }

    #[test]
    fn params_roundtrip_json() {
        let params = EnsembleParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: EnsembleParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
