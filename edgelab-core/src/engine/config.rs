//! Backtest configuration and its domain checks.
//!
//! The engine trusts the config it is handed. `validate` exists for callers
//! that build configs by hand or from TOML and want a typed error instead of
//! a silently degenerate run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::signal::{EnsembleParams, MeanReversionParams, TrendParams, Voter};
use crate::components::{Sizing, StrategyParams};
use crate::metrics::SharpeScaling;

use super::session::SessionRules;

/// Errors from `BacktestConfig::validate`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min}, got {value}")]
    PeriodTooShort {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{low} must be below {high}")]
    Unordered {
        low: &'static str,
        high: &'static str,
    },

    #[error("entry hour {0} is not in 0..=23")]
    InvalidHour(u32),

    #[error("min_votes must be in 1..={max}, got {min_votes}")]
    InvalidVotes { min_votes: usize, max: usize },
}

/// Everything a single run needs besides the price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Flat fee charged on every entry and every exit.
    pub fee_per_order: f64,
    #[serde(default)]
    pub sizing: Sizing,
    pub strategy: StrategyParams,
    pub max_hold_bars: usize,
    /// Entries need `volatility[t-1]` strictly above this.
    pub min_volatility: f64,
    pub volatility_period: usize,
    #[serde(default)]
    pub session: SessionRules,
    #[serde(default)]
    pub sharpe_scaling: SharpeScaling,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            fee_per_order: 1.0,
            sizing: Sizing::default(),
            strategy: StrategyParams::default(),
            max_hold_bars: 48,
            min_volatility: 0.0,
            volatility_period: 20,
            session: SessionRules::default(),
            sharpe_scaling: SharpeScaling::default(),
        }
    }
}

impl BacktestConfig {
    /// Check every parameter domain. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_capital", self.initial_capital)?;
        if !(self.fee_per_order >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "fee_per_order",
                value: self.fee_per_order,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        validate_sizing(&self.sizing)?;
        validate_strategy(&self.strategy)?;
        period("max_hold_bars", self.max_hold_bars, 1)?;
        period("volatility_period", self.volatility_period, 1)?;
        if !(self.min_volatility >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "min_volatility",
                value: self.min_volatility,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        if let Some(&hour) = self.session.allowed_entry_hours.iter().find(|&&h| h > 23) {
            return Err(ConfigError::InvalidHour(hour));
        }
        if let (Some(late), Some(eod)) = (self.session.late_entry_cutoff, self.session.eod_cutoff) {
            if late > eod {
                return Err(ConfigError::Unordered {
                    low: "late_entry_cutoff",
                    high: "eod_cutoff",
                });
            }
        }
        if let SharpeScaling::TradesPerYear(n) = self.sharpe_scaling {
            positive("sharpe_scaling.trades_per_year", n)?;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn period(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::PeriodTooShort { field, value, min })
    }
}

fn ordered(low: &'static str, a: f64, high: &'static str, b: f64) -> Result<(), ConfigError> {
    if a < b {
        Ok(())
    } else {
        Err(ConfigError::Unordered { low, high })
    }
}

fn validate_sizing(sizing: &Sizing) -> Result<(), ConfigError> {
    match *sizing {
        Sizing::Fraction { fraction } => {
            positive("sizing.fraction", fraction)?;
            in_range("sizing.fraction", fraction, 0.0, 1.0)
        }
        Sizing::Kelly {
            scale,
            cap,
            fallback,
            ..
        } => {
            positive("sizing.scale", scale)?;
            positive("sizing.cap", cap)?;
            in_range("sizing.cap", cap, 0.0, 1.0)?;
            positive("sizing.fallback", fallback)?;
            in_range("sizing.fallback", fallback, 0.0, 1.0)
        }
    }
}

fn validate_mean_reversion(p: &MeanReversionParams) -> Result<(), ConfigError> {
    period("rsi_period", p.rsi_period, 1)?;
    in_range("entry_threshold", p.entry_threshold, 0.0, 100.0)?;
    in_range("exit_threshold", p.exit_threshold, 0.0, 100.0)?;
    ordered("entry_threshold", p.entry_threshold, "exit_threshold", p.exit_threshold)
}

fn validate_trend(p: &TrendParams) -> Result<(), ConfigError> {
    period("fast_period", p.fast_period, 1)?;
    period("slow_period", p.slow_period, 1)?;
    period("pulse_period", p.pulse_period, 1)?;
    if p.fast_period >= p.slow_period {
        return Err(ConfigError::Unordered {
            low: "fast_period",
            high: "slow_period",
        });
    }
    in_range("pulse_threshold", p.pulse_threshold, 0.0, 100.0)
}

fn validate_ensemble(p: &EnsembleParams) -> Result<(), ConfigError> {
    if p.min_votes == 0 || p.min_votes > p.voters.len() {
        return Err(ConfigError::InvalidVotes {
            min_votes: p.min_votes,
            max: p.voters.len(),
        });
    }
    for voter in &p.voters {
        let min_period = match voter {
            Voter::ZScore { .. } => 2,
            Voter::Rsi { .. } | Voter::Roc { .. } => 1,
        };
        period("voter.period", voter.period(), min_period)?;
    }
    Ok(())
}

fn validate_strategy(strategy: &StrategyParams) -> Result<(), ConfigError> {
    match strategy {
        StrategyParams::MeanReversion(p) => validate_mean_reversion(p),
        StrategyParams::TrendFollowing(p) => validate_trend(p),
        StrategyParams::Hybrid(p) => {
            period("er_period", p.er_period, 1)?;
            in_range("mr_threshold", p.mr_threshold, 0.0, 1.0)?;
            in_range("trend_threshold", p.trend_threshold, 0.0, 1.0)?;
            if p.mr_threshold > p.trend_threshold {
                return Err(ConfigError::Unordered {
                    low: "mr_threshold",
                    high: "trend_threshold",
                });
            }
            validate_mean_reversion(&p.mean_reversion)?;
            validate_trend(&p.trend)
        }
        StrategyParams::Ensemble(p) => validate_ensemble(p),
    }
}
