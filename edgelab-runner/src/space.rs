//! Parameter space: inclusive numeric ranges per strategy family.
//!
//! `sample` draws one `BacktestConfig` from the space. `zoom` shrinks every
//! range around a centre config, clamped to the original bounds, for the
//! coarse-then-fine refinement pass.

use rand::Rng;
use serde::{Deserialize, Serialize};

use edgelab_core::components::signal::{
    EnsembleParams, HybridParams, MeanReversionParams, TrendParams, Voter,
};
use edgelab_core::components::{Sizing, StrategyKind, StrategyParams};
use edgelab_core::engine::{BacktestConfig, SessionRules};

use crate::error::SearchError;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: usize,
    pub max: usize,
}

impl IntRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn fixed(value: usize) -> Self {
        Self::new(value, value)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min..=self.max)
    }

    /// Range of `factor × width` centred on `center`, inside the current bounds.
    pub fn zoom(&self, center: usize, factor: f64) -> Self {
        let half = ((self.max - self.min) as f64 * factor / 2.0).round() as usize;
        let center = center.clamp(self.min, self.max);
        Self {
            min: center.saturating_sub(half).max(self.min),
            max: (center + half).min(self.max),
        }
    }

    fn check(&self, name: &str) -> Result<(), SearchError> {
        if self.min > self.max {
            return Err(SearchError::Space(format!(
                "{name}: min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive float range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn zoom(&self, center: f64, factor: f64) -> Self {
        let half = (self.max - self.min) * factor / 2.0;
        let center = center.clamp(self.min, self.max);
        Self {
            min: (center - half).max(self.min),
            max: (center + half).min(self.max),
        }
    }

    fn check(&self, name: &str) -> Result<(), SearchError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(SearchError::Space(format!(
                "{name}: invalid range [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// ─── Per-family spaces ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionSpace {
    pub rsi_period: IntRange,
    pub entry_threshold: FloatRange,
    pub exit_threshold: FloatRange,
}

impl Default for MeanReversionSpace {
    fn default() -> Self {
        Self {
            rsi_period: IntRange::new(2, 30),
            entry_threshold: FloatRange::new(10.0, 40.0),
            exit_threshold: FloatRange::new(45.0, 80.0),
        }
    }
}

impl MeanReversionSpace {
    fn sample<R: Rng>(&self, rng: &mut R) -> MeanReversionParams {
        let mut entry = self.entry_threshold.sample(rng);
        let mut exit = self.exit_threshold.sample(rng);
        if exit < entry {
            std::mem::swap(&mut entry, &mut exit);
        }
        MeanReversionParams {
            rsi_period: self.rsi_period.sample(rng),
            entry_threshold: entry,
            exit_threshold: exit,
        }
    }

    fn zoom(&self, c: &MeanReversionParams, f: f64) -> Self {
        Self {
            rsi_period: self.rsi_period.zoom(c.rsi_period, f),
            entry_threshold: self.entry_threshold.zoom(c.entry_threshold, f),
            exit_threshold: self.exit_threshold.zoom(c.exit_threshold, f),
        }
    }

    fn check(&self) -> Result<(), SearchError> {
        self.rsi_period.check("rsi_period")?;
        self.entry_threshold.check("entry_threshold")?;
        self.exit_threshold.check("exit_threshold")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSpace {
    pub fast_period: IntRange,
    pub slow_period: IntRange,
    pub pulse_period: IntRange,
    pub pulse_threshold: FloatRange,
}

impl Default for TrendSpace {
    fn default() -> Self {
        Self {
            fast_period: IntRange::new(3, 20),
            slow_period: IntRange::new(20, 100),
            pulse_period: IntRange::new(5, 30),
            pulse_threshold: FloatRange::new(50.0, 70.0),
        }
    }
}

impl TrendSpace {
    fn sample<R: Rng>(&self, rng: &mut R) -> TrendParams {
        let fast = self.fast_period.sample(rng);
        let slow = self.slow_period.sample(rng);
        // Slow must be strictly longer: keep the smaller as fast, larger + 1 as slow
        let (fast_period, slow_period) = if slow <= fast {
            (slow.min(fast), slow.max(fast) + 1)
        } else {
            (fast, slow)
        };
        TrendParams {
            fast_period,
            slow_period,
            pulse_period: self.pulse_period.sample(rng),
            pulse_threshold: self.pulse_threshold.sample(rng),
        }
    }

    fn zoom(&self, c: &TrendParams, f: f64) -> Self {
        Self {
            fast_period: self.fast_period.zoom(c.fast_period, f),
            slow_period: self.slow_period.zoom(c.slow_period, f),
            pulse_period: self.pulse_period.zoom(c.pulse_period, f),
            pulse_threshold: self.pulse_threshold.zoom(c.pulse_threshold, f),
        }
    }

    fn check(&self) -> Result<(), SearchError> {
        self.fast_period.check("fast_period")?;
        self.slow_period.check("slow_period")?;
        self.pulse_period.check("pulse_period")?;
        self.pulse_threshold.check("pulse_threshold")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridSpace {
    pub er_period: IntRange,
    pub mr_threshold: FloatRange,
    pub trend_threshold: FloatRange,
    pub mean_reversion: MeanReversionSpace,
    pub trend: TrendSpace,
}

impl Default for HybridSpace {
    fn default() -> Self {
        Self {
            er_period: IntRange::new(10, 40),
            mr_threshold: FloatRange::new(0.15, 0.4),
            trend_threshold: FloatRange::new(0.45, 0.8),
            mean_reversion: MeanReversionSpace::default(),
            trend: TrendSpace::default(),
        }
    }
}

impl HybridSpace {
    fn sample<R: Rng>(&self, rng: &mut R) -> HybridParams {
        let mut mr = self.mr_threshold.sample(rng);
        let mut trend = self.trend_threshold.sample(rng);
        if trend < mr {
            std::mem::swap(&mut mr, &mut trend);
        }
        HybridParams {
            er_period: self.er_period.sample(rng),
            mr_threshold: mr,
            trend_threshold: trend,
            mean_reversion: self.mean_reversion.sample(rng),
            trend: self.trend.sample(rng),
        }
    }

    fn zoom(&self, c: &HybridParams, f: f64) -> Self {
        Self {
            er_period: self.er_period.zoom(c.er_period, f),
            mr_threshold: self.mr_threshold.zoom(c.mr_threshold, f),
            trend_threshold: self.trend_threshold.zoom(c.trend_threshold, f),
            mean_reversion: self.mean_reversion.zoom(&c.mean_reversion, f),
            trend: self.trend.zoom(&c.trend, f),
        }
    }

    fn check(&self) -> Result<(), SearchError> {
        self.er_period.check("er_period")?;
        self.mr_threshold.check("mr_threshold")?;
        self.trend_threshold.check("trend_threshold")?;
        self.mean_reversion.check()?;
        self.trend.check()
    }
}

/// Ranges for one voter: period plus its two levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoterSpace {
    pub period: IntRange,
    pub enter_below: FloatRange,
    pub exit_above: FloatRange,
}

impl VoterSpace {
    fn sample<R: Rng>(&self, rng: &mut R) -> (usize, f64, f64) {
        (
            self.period.sample(rng),
            self.enter_below.sample(rng),
            self.exit_above.sample(rng),
        )
    }

    fn zoom(&self, voter: &Voter, f: f64) -> Self {
        let (period, enter_below, exit_above) = voter_fields(voter);
        Self {
            period: self.period.zoom(period, f),
            enter_below: self.enter_below.zoom(enter_below, f),
            exit_above: self.exit_above.zoom(exit_above, f),
        }
    }

    fn check(&self, name: &str) -> Result<(), SearchError> {
        self.period.check(&format!("{name}.period"))?;
        self.enter_below.check(&format!("{name}.enter_below"))?;
        self.exit_above.check(&format!("{name}.exit_above"))
    }
}

fn voter_fields(voter: &Voter) -> (usize, f64, f64) {
    match *voter {
        Voter::Rsi {
            period,
            enter_below,
            exit_above,
        }
        | Voter::ZScore {
            period,
            enter_below,
            exit_above,
        }
        | Voter::Roc {
            period,
            enter_below,
            exit_above,
        } => (period, enter_below, exit_above),
    }
}

/// Ensemble of one RSI, one z-score and one rate-of-change voter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleSpace {
    pub rsi: VoterSpace,
    pub zscore: VoterSpace,
    pub roc: VoterSpace,
    pub min_votes: IntRange,
}

impl Default for EnsembleSpace {
    fn default() -> Self {
        Self {
            rsi: VoterSpace {
                period: IntRange::new(5, 30),
                enter_below: FloatRange::new(20.0, 40.0),
                exit_above: FloatRange::new(50.0, 70.0),
            },
            zscore: VoterSpace {
                period: IntRange::new(10, 50),
                enter_below: FloatRange::new(-2.5, -1.0),
                exit_above: FloatRange::new(-0.5, 1.0),
            },
            roc: VoterSpace {
                period: IntRange::new(3, 20),
                enter_below: FloatRange::new(-5.0, -1.0),
                exit_above: FloatRange::new(0.0, 3.0),
            },
            min_votes: IntRange::new(2, 3),
        }
    }
}

impl EnsembleSpace {
    fn sample<R: Rng>(&self, rng: &mut R) -> EnsembleParams {
        let (period, enter_below, exit_above) = self.rsi.sample(rng);
        let rsi = Voter::Rsi {
            period,
            enter_below,
            exit_above,
        };
        let (period, enter_below, exit_above) = self.zscore.sample(rng);
        let zscore = Voter::ZScore {
            period: period.max(2),
            enter_below,
            exit_above,
        };
        let (period, enter_below, exit_above) = self.roc.sample(rng);
        let roc = Voter::Roc {
            period,
            enter_below,
            exit_above,
        };
        EnsembleParams {
            voters: [rsi, zscore, roc],
            min_votes: self.min_votes.sample(rng),
        }
    }

    /// Zooms only when the centre has the same voter layout as this space.
    fn zoom(&self, c: &EnsembleParams, f: f64) -> Self {
        match &c.voters {
            [rsi @ Voter::Rsi { .. }, zscore @ Voter::ZScore { .. }, roc @ Voter::Roc { .. }] => {
                Self {
                    rsi: self.rsi.zoom(rsi, f),
                    zscore: self.zscore.zoom(zscore, f),
                    roc: self.roc.zoom(roc, f),
                    min_votes: self.min_votes.zoom(c.min_votes, f),
                }
            }
            _ => self.clone(),
        }
    }

    fn check(&self) -> Result<(), SearchError> {
        self.rsi.check("rsi")?;
        self.zscore.check("zscore")?;
        self.roc.check("roc")?;
        self.min_votes.check("min_votes")
    }
}

/// One searchable strategy family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpace {
    MeanReversion(MeanReversionSpace),
    TrendFollowing(TrendSpace),
    Hybrid(HybridSpace),
    Ensemble(EnsembleSpace),
}

impl StrategySpace {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::MeanReversion(_) => StrategyKind::MeanReversion,
            Self::TrendFollowing(_) => StrategyKind::TrendFollowing,
            Self::Hybrid(_) => StrategyKind::Hybrid,
            Self::Ensemble(_) => StrategyKind::Ensemble,
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> StrategyParams {
        match self {
            Self::MeanReversion(s) => StrategyParams::MeanReversion(s.sample(rng)),
            Self::TrendFollowing(s) => StrategyParams::TrendFollowing(s.sample(rng)),
            Self::Hybrid(s) => StrategyParams::Hybrid(s.sample(rng)),
            Self::Ensemble(s) => StrategyParams::Ensemble(s.sample(rng)),
        }
    }

    /// `None` when `center` belongs to another family.
    pub fn zoom(&self, center: &StrategyParams, factor: f64) -> Option<Self> {
        match (self, center) {
            (Self::MeanReversion(s), StrategyParams::MeanReversion(c)) => {
                Some(Self::MeanReversion(s.zoom(c, factor)))
            }
            (Self::TrendFollowing(s), StrategyParams::TrendFollowing(c)) => {
                Some(Self::TrendFollowing(s.zoom(c, factor)))
            }
            (Self::Hybrid(s), StrategyParams::Hybrid(c)) => Some(Self::Hybrid(s.zoom(c, factor))),
            (Self::Ensemble(s), StrategyParams::Ensemble(c)) => {
                Some(Self::Ensemble(s.zoom(c, factor)))
            }
            _ => None,
        }
    }

    fn check(&self) -> Result<(), SearchError> {
        match self {
            Self::MeanReversion(s) => s.check(),
            Self::TrendFollowing(s) => s.check(),
            Self::Hybrid(s) => s.check(),
            Self::Ensemble(s) => s.check(),
        }
    }
}

// ─── Whole space ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamSpace {
    /// Families to draw from, uniformly.
    pub strategies: Vec<StrategySpace>,
    pub max_hold_bars: IntRange,
    pub min_volatility: FloatRange,
    pub volatility_period: IntRange,
    /// Fixed-fraction sizing range.
    pub fraction: FloatRange,
    pub session: SessionRules,
}

impl Default for ParamSpace {
    fn default() -> Self {
        Self {
            strategies: vec![
                StrategySpace::MeanReversion(MeanReversionSpace::default()),
                StrategySpace::TrendFollowing(TrendSpace::default()),
                StrategySpace::Hybrid(HybridSpace::default()),
                StrategySpace::Ensemble(EnsembleSpace::default()),
            ],
            max_hold_bars: IntRange::new(5, 100),
            min_volatility: FloatRange::new(0.0, 0.01),
            volatility_period: IntRange::new(10, 40),
            fraction: FloatRange::new(0.5, 0.95),
            session: SessionRules::default(),
        }
    }
}

impl ParamSpace {
    /// Reject empty or inverted ranges before any sampling happens.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.strategies.is_empty() {
            return Err(SearchError::Space("no strategy families".into()));
        }
        for s in &self.strategies {
            s.check()?;
        }
        self.max_hold_bars.check("max_hold_bars")?;
        self.min_volatility.check("min_volatility")?;
        self.volatility_period.check("volatility_period")?;
        self.fraction.check("fraction")
    }

    /// Draw one candidate. Capital, fee and Sharpe scaling come from `template`.
    pub fn sample<R: Rng>(&self, rng: &mut R, template: &BacktestConfig) -> BacktestConfig {
        let strategy = match self.strategies.len() {
            0 => template.strategy.clone(),
            n => self.strategies[rng.gen_range(0..n)].sample(rng),
        };
        BacktestConfig {
            strategy,
            max_hold_bars: self.max_hold_bars.sample(rng),
            min_volatility: self.min_volatility.sample(rng),
            volatility_period: self.volatility_period.sample(rng),
            sizing: Sizing::Fraction {
                fraction: self.fraction.sample(rng),
            },
            session: self.session.clone(),
            ..template.clone()
        }
    }

    /// Shrink every range to `factor` of its width around `center`.
    ///
    /// Only the family of `center` survives. If the space has no such family,
    /// strategy ranges are left untouched.
    pub fn zoom(&self, center: &BacktestConfig, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let zoomed: Vec<StrategySpace> = self
            .strategies
            .iter()
            .filter_map(|s| s.zoom(&center.strategy, factor))
            .collect();
        let fraction = match center.sizing {
            Sizing::Fraction { fraction } => self.fraction.zoom(fraction, factor),
            Sizing::Kelly { .. } => self.fraction,
        };
        Self {
            strategies: if zoomed.is_empty() {
                self.strategies.clone()
            } else {
                zoomed
            },
            max_hold_bars: self.max_hold_bars.zoom(center.max_hold_bars, factor),
            min_volatility: self.min_volatility.zoom(center.min_volatility, factor),
            volatility_period: self
                .volatility_period
                .zoom(center.volatility_period, factor),
            fraction,
            session: self.session.clone(),
        }
    }
}
