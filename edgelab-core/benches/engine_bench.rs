//! Criterion benchmarks for EdgeLab hot paths.
//!
//! Benchmarks:
//! 1. Bar loop (full backtest per strategy family)
//! 2. Indicator precompute (momentum, volatility, efficiency ratio, stacks)
//! 3. Metrics over a long ledger

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use edgelab_core::components::indicator::Indicator;
use edgelab_core::components::signal::{
    EnsembleParams, HybridParams, MeanReversionParams, TrendParams,
};
use edgelab_core::components::StrategyParams;
use edgelab_core::domain::PriceBar;
use edgelab_core::engine::precompute::precompute_indicators;
use edgelab_core::engine::{run_backtest, BacktestConfig};
use edgelab_core::indicators::{CloseRange, EfficiencyRatio, Ema, Rsi, ZScore};
use edgelab_core::metrics::{Metrics, SharpeScaling};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0 + (i as f64 * 0.013).cos() * 4.0)
        .collect()
}

fn make_bars(n: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    make_closes(n)
        .into_iter()
        .enumerate()
        .map(|(i, c)| PriceBar::new(start + Duration::minutes(5 * i as i64), c))
        .collect()
}

fn strategies() -> Vec<(&'static str, StrategyParams)> {
    vec![
        (
            "mean_reversion",
            StrategyParams::MeanReversion(MeanReversionParams::default()),
        ),
        (
            "trend_following",
            StrategyParams::TrendFollowing(TrendParams::default()),
        ),
        ("hybrid", StrategyParams::Hybrid(HybridParams::default())),
        ("ensemble", StrategyParams::Ensemble(EnsembleParams::default())),
    ]
}

// ── 1. Bar Loop ──────────────────────────────────────────────────────

fn bench_bar_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar_loop");

    for &bar_count in &[1_000, 10_000, 50_000] {
        let bars = make_bars(bar_count);
        for (name, strategy) in strategies() {
            let config = BacktestConfig {
                strategy,
                ..Default::default()
            };
            group.bench_with_input(BenchmarkId::new(name, bar_count), &bar_count, |b, _| {
                b.iter(|| run_backtest(black_box(&bars), black_box(&config)));
            });
        }
    }

    group.finish();
}

// ── 2. Indicator Precompute ──────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_precompute");

    for &bar_count in &[1_000, 10_000, 50_000] {
        let closes = make_closes(bar_count);

        let rsi: Vec<Box<dyn Indicator>> = vec![Box::new(Rsi::new(14))];
        group.bench_with_input(BenchmarkId::new("rsi_14", bar_count), &bar_count, |b, _| {
            b.iter(|| precompute_indicators(black_box(&closes), black_box(&rsi)));
        });

        let full_stack: Vec<Box<dyn Indicator>> = vec![
            Box::new(Rsi::new(14)),
            Box::new(CloseRange::new(20)),
            Box::new(EfficiencyRatio::new(20)),
            Box::new(Ema::new(12)),
            Box::new(Ema::new(48)),
            Box::new(ZScore::new(20)),
        ];
        group.bench_with_input(
            BenchmarkId::new("full_stack_6", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| precompute_indicators(black_box(&closes), black_box(&full_stack)));
            },
        );
    }

    group.finish();
}

// ── 3. Metrics ───────────────────────────────────────────────────────

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    let bars = make_bars(50_000);
    let config = BacktestConfig {
        max_hold_bars: 10,
        ..Default::default()
    };
    let trades = run_backtest(&bars, &config).trades;

    group.bench_function("compute_sqrt252", |b| {
        b.iter(|| {
            Metrics::compute(
                black_box(&trades),
                config.initial_capital,
                SharpeScaling::Sqrt252,
            )
        });
    });
    group.bench_function("compute_observed", |b| {
        b.iter(|| {
            Metrics::compute(
                black_box(&trades),
                config.initial_capital,
                SharpeScaling::Observed,
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_bar_loop, bench_indicators, bench_metrics);
criterion_main!(benches);
