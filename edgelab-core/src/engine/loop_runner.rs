//! Bar-by-bar loop: the heart of the backtesting engine.
//!
//! Two states: flat or in position. At bar t every decision reads indicator
//! values at t-1; fills happen at close[t].
//!
//! Flat: enter if the rule fires, volatility clears the floor, the session
//! allows it and at least one whole unit is affordable.
//! In position: tick, then exit on the first of Signal, MaxHold, EndOfDay.

use tracing::{debug, trace, warn};

use crate::components::indicator::Indicator;
use crate::components::signal::{DecisionContext, SignalRule};
use crate::domain::{closes, ExitReason, PriceBar};
use crate::indicators::CloseRange;
use crate::metrics::Metrics;

use super::config::BacktestConfig;
use super::precompute::{compute_warmup, precompute_indicators};
use super::state::{BacktestResult, EngineState};

/// Data quality threshold: warn if the void bar rate exceeds this fraction.
const VOID_BAR_RATE_THRESHOLD: f64 = 0.10;

/// Whole units affordable: `floor((capital × fraction − fee) / price)`.
///
/// Zero when the budget does not cover the fee or the price is unusable.
pub fn compute_quantity(capital: f64, fraction: f64, fee: f64, price: f64) -> u64 {
    let budget = capital * fraction - fee;
    if !(budget > 0.0) || !(price > 0.0) {
        return 0;
    }
    (budget / price).floor() as u64
}

/// Run a backtest over one close series.
///
/// Deterministic: the same bars and config always produce the same result.
/// Never fails on market conditions. Undefined indicators skip the bar and a
/// run without trades yields neutral metrics.
pub fn run_backtest(bars: &[PriceBar], config: &BacktestConfig) -> BacktestResult {
    let closes = closes(bars);
    let rule = config.strategy.build_rule();

    let volatility = CloseRange::new(config.volatility_period);
    let vol_key = volatility.name().to_string();
    let mut indicators = rule.indicators();
    indicators.push(Box::new(volatility));

    let indicator_values = precompute_indicators(&closes, &indicators);
    let warmup_bars = compute_warmup(&indicators);
    let ctx = DecisionContext::new(&closes, &indicator_values);

    let mut state = EngineState::new(config.initial_capital);
    let mut capital_curve = Vec::with_capacity(bars.len());
    let mut last_valid: Option<usize> = None;
    let mut void_bars = 0usize;

    for (t, bar) in bars.iter().enumerate() {
        if bar.is_void() {
            // Time still passes for the open position; no decisions, no fills.
            void_bars += 1;
            if let Some(pos) = state.position.as_mut() {
                pos.tick_bar();
            }
            let mark = last_valid.map(|i| bars[i].close).unwrap_or(0.0);
            capital_curve.push(state.equity(mark));
            continue;
        }

        if t >= 1 {
            let decision_index = t - 1;
            if state.is_flat() {
                try_enter(&mut state, rule.as_ref(), &ctx, &vol_key, config, t, bar);
            } else {
                check_exit(&mut state, rule.as_ref(), &ctx, config, t, bar, decision_index);
            }
        }

        last_valid = Some(t);
        capital_curve.push(state.equity(bar.close));
    }

    // Realise anything still open at the last usable close.
    if let Some(t) = last_valid {
        if let Some(trade) = state.close(t, &bars[t], ExitReason::EndOfData, config.fee_per_order) {
            debug!(
                bar = t,
                price = trade.exit_price,
                net_pnl = trade.net_pnl,
                "exit end_of_data"
            );
            for c in &mut capital_curve[t..] {
                *c = state.capital;
            }
        }
    }

    if !bars.is_empty() {
        let rate = void_bars as f64 / bars.len() as f64;
        if rate > VOID_BAR_RATE_THRESHOLD {
            warn!(
                void_bars,
                total_bars = bars.len(),
                "void bar rate {:.1}% exceeds {:.0}% threshold",
                rate * 100.0,
                VOID_BAR_RATE_THRESHOLD * 100.0
            );
        }
    }

    let metrics = Metrics::compute(&state.trades, config.initial_capital, config.sharpe_scaling);
    debug!(
        strategy = rule.name(),
        trades = metrics.trade_count,
        total_return_pct = metrics.total_return_pct,
        "backtest complete"
    );

    BacktestResult {
        final_capital: state.capital,
        trades: state.trades,
        metrics,
        capital_curve,
        warmup_bars,
    }
}

fn try_enter(
    state: &mut EngineState,
    rule: &dyn SignalRule,
    ctx: &DecisionContext<'_>,
    vol_key: &str,
    config: &BacktestConfig,
    t: usize,
    bar: &PriceBar,
) {
    let decision_index = t - 1;
    let Some(kind) = rule.entry(ctx, decision_index) else {
        return;
    };
    match ctx.indicators.ready(vol_key, decision_index) {
        Some(vol) if vol > config.min_volatility => {}
        _ => return,
    }
    if !config.session.entry_allowed(bar) {
        return;
    }

    let fraction = config.sizing.fraction(&state.trades);
    let quantity = compute_quantity(state.capital, fraction, config.fee_per_order, bar.close);
    if quantity == 0 {
        trace!(
            bar = t,
            price = bar.close,
            capital = state.capital,
            fraction,
            "entry signal unaffordable"
        );
        return;
    }

    state.open(t, bar, quantity, config.fee_per_order, kind);
    debug!(bar = t, price = bar.close, quantity, ?kind, "entry");
}

fn check_exit(
    state: &mut EngineState,
    rule: &dyn SignalRule,
    ctx: &DecisionContext<'_>,
    config: &BacktestConfig,
    t: usize,
    bar: &PriceBar,
    decision_index: usize,
) {
    let reason = {
        let Some(pos) = state.position.as_mut() else {
            return;
        };
        pos.tick_bar();
        if rule.exit(ctx, decision_index, pos) {
            Some(ExitReason::Signal)
        } else if pos.bars_held >= config.max_hold_bars {
            Some(ExitReason::MaxHold)
        } else if config.session.is_end_of_day(bar) {
            Some(ExitReason::EndOfDay)
        } else {
            None
        }
    };

    if let Some(reason) = reason {
        if let Some(trade) = state.close(t, bar, reason, config.fee_per_order) {
            debug!(
                bar = t,
                price = trade.exit_price,
                quantity = trade.quantity,
                bars_held = trade.bars_held,
                net_pnl = trade.net_pnl,
                reason = reason.as_str(),
                "exit"
            );
        }
    }
}
