//! Random search and zoom refinement.
//!
//! Each stage evaluates its iterations in parallel over a shared bar slice.
//! Every iteration draws from its own `(stage, iteration)` RNG and results
//! are folded into the leaderboard in iteration order, so the outcome does
//! not depend on thread count.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use edgelab_core::domain::PriceBar;
use edgelab_core::engine::{run_backtest, BacktestConfig};

use crate::config::SearchConfig;
use crate::constraints::{Rejection, RejectionCounts};
use crate::error::SearchError;
use crate::fingerprint::fingerprint;
use crate::leaderboard::{Candidate, InsertResult, Leaderboard};
use crate::rng::RngHierarchy;
use crate::space::ParamSpace;

/// Summary of one or more search stages.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub leaderboard: Leaderboard,
    pub evaluated: usize,
    pub accepted: usize,
    pub rejected: RejectionCounts,
}

impl SearchReport {
    fn empty(config: &SearchConfig) -> Self {
        Self {
            leaderboard: Leaderboard::new(config.leaderboard_size, config.fitness),
            evaluated: 0,
            accepted: 0,
            rejected: RejectionCounts::default(),
        }
    }

    fn absorb(&mut self, stage: SearchReport) {
        self.evaluated += stage.evaluated;
        self.accepted += stage.accepted;
        self.rejected.merge(&stage.rejected);
        self.leaderboard.merge(stage.leaderboard);
    }
}

enum Outcome {
    Accepted(Candidate),
    Rejected(Rejection),
}

/// Random search over `config.space`, then zoom refinement around the best.
pub fn run_search(bars: &[PriceBar], config: &SearchConfig) -> Result<SearchReport, SearchError> {
    let mut report = run_random_search(bars, config)?;
    let refined = refine(bars, config, &report.leaderboard)?;
    report.evaluated += refined.evaluated;
    report.accepted += refined.accepted;
    report.rejected.merge(&refined.rejected);
    report.leaderboard = refined.leaderboard;
    Ok(report)
}

/// Sample `config.iterations` candidates uniformly from the space.
pub fn run_random_search(
    bars: &[PriceBar],
    config: &SearchConfig,
) -> Result<SearchReport, SearchError> {
    check_inputs(bars, config)?;
    info!(
        iterations = config.iterations,
        bars = bars.len(),
        seed = config.master_seed,
        "random search"
    );
    let report = run_stage(bars, config, &config.space, "random", config.iterations)?;
    info!(
        accepted = report.accepted,
        rejected = report.rejected.total(),
        best = ?report.leaderboard.best().map(|c| c.fitness),
        "random search done"
    );
    Ok(report)
}

/// Coarse-to-fine refinement.
///
/// Round `r` samples `zoom.iterations` candidates from the original space
/// shrunk to `zoom.factor^(r+1)` of its width around the current best.
/// The returned leaderboard is `leaderboard` merged with every round;
/// counts cover the zoom rounds only.
pub fn refine(
    bars: &[PriceBar],
    config: &SearchConfig,
    leaderboard: &Leaderboard,
) -> Result<SearchReport, SearchError> {
    check_inputs(bars, config)?;
    let mut report = SearchReport {
        leaderboard: leaderboard.clone(),
        ..SearchReport::empty(config)
    };

    for round in 0..config.zoom.rounds {
        let Some(best) = report.leaderboard.best() else {
            debug!(round, "nothing to zoom around");
            break;
        };
        let factor = config.zoom.factor.powi(round as i32 + 1);
        let space = config.space.zoom(&best.config, factor);
        let stage = format!("zoom-{round}");
        info!(
            round,
            factor,
            center = best.fingerprint.short(),
            "zoom round"
        );
        let stage_report = run_stage(bars, config, &space, &stage, config.zoom.iterations)?;
        report.absorb(stage_report);
    }
    Ok(report)
}

fn check_inputs(bars: &[PriceBar], config: &SearchConfig) -> Result<(), SearchError> {
    if bars.is_empty() {
        return Err(SearchError::EmptySeries);
    }
    config.space.validate()?;
    config.template().validate()?;
    Ok(())
}

fn run_stage(
    bars: &[PriceBar],
    config: &SearchConfig,
    space: &ParamSpace,
    stage: &str,
    iterations: usize,
) -> Result<SearchReport, SearchError> {
    let rng = RngHierarchy::new(config.master_seed);
    let template = config.template();

    let evaluate_all = || {
        (0..iterations as u64)
            .into_par_iter()
            .map(|i| {
                let mut r = rng.rng_for(stage, i);
                let candidate = space.sample(&mut r, &template);
                evaluate(bars, candidate, config, stage, i)
            })
            .collect::<Result<Vec<_>, SearchError>>()
    };
    let outcomes = match config.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()?
            .install(evaluate_all)?,
        None => evaluate_all()?,
    };

    let mut report = SearchReport::empty(config);
    report.evaluated = outcomes.len();
    for outcome in outcomes {
        match outcome {
            Outcome::Accepted(candidate) => {
                report.accepted += 1;
                let iteration = candidate.iteration;
                let fitness = candidate.fitness;
                if report.leaderboard.insert(candidate) != InsertResult::Skipped {
                    debug!(stage, iteration, fitness, "leaderboard update");
                }
            }
            Outcome::Rejected(rejection) => report.rejected.record(&rejection),
        }
    }
    Ok(report)
}

fn evaluate(
    bars: &[PriceBar],
    candidate: BacktestConfig,
    config: &SearchConfig,
    stage: &str,
    iteration: u64,
) -> Result<Outcome, SearchError> {
    if let Err(e) = candidate.validate() {
        return Ok(Outcome::Rejected(Rejection::Invalid(e.to_string())));
    }
    let result = run_backtest(bars, &candidate);
    if let Err(rejection) = config.constraints.check(&result) {
        return Ok(Outcome::Rejected(rejection));
    }
    let fitness = config.fitness.extract(&result.metrics);
    if !fitness.is_finite() {
        return Ok(Outcome::Rejected(Rejection::NonFiniteFitness));
    }
    Ok(Outcome::Accepted(Candidate {
        fingerprint: fingerprint(&candidate)?,
        config: candidate,
        metrics: result.metrics,
        fitness,
        iteration,
        stage: stage.to_string(),
    }))
}
