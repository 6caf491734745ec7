//! Breakout detection against trend lines and horizontal levels.
//!
//! A breakout needs three things inside the lookback window: a candle that
//! closed on the wrong side of the reference, an unbroken run of closes on
//! the breakout side after it spanning at least the confirmation count, and
//! a move of at least the minimum percentage. Confirmation is a
//! precondition for emission, so every emitted breakout has
//! `confirmed = true`.

use crate::config::analysis::BreakoutSettings;
use crate::models::breakout::{Breakout, BreakoutDirection, BreakoutSource};
use crate::models::geometry::{LevelSet, TrendLineSet};
use crate::models::timeseries::OhlcvTimeSeries;

/// Scan the most recent candles for breakouts from fitted trend lines.
/// Bullish breakouts cross resistance lines, bearish breakouts cross
/// support lines.
pub fn detect_trend_line_breakouts(
    series: &OhlcvTimeSeries,
    trend_lines: &TrendLineSet,
    settings: &BreakoutSettings,
) -> Vec<Breakout> {
    if series.is_empty() || trend_lines.is_empty() {
        return Vec::new();
    }

    let mut breakouts = Vec::new();
    let window = recent_window(series, settings.lookback);

    for line in &trend_lines.resistance {
        let reference = &line.values[line.values.len() - window.len()..];
        if let Some(breakout) = check_breakout(
            series,
            &window,
            reference,
            BreakoutDirection::Bullish,
            BreakoutSource::TrendLine,
            line.strength,
            None,
            settings,
        ) {
            breakouts.push(breakout);
        }
    }

    for line in &trend_lines.support {
        let reference = &line.values[line.values.len() - window.len()..];
        if let Some(breakout) = check_breakout(
            series,
            &window,
            reference,
            BreakoutDirection::Bearish,
            BreakoutSource::TrendLine,
            line.strength,
            None,
            settings,
        ) {
            breakouts.push(breakout);
        }
    }

    sort_recent_first(&mut breakouts);
    breakouts
}

/// Scan the most recent candles for breakouts from horizontal levels.
pub fn detect_horizontal_breakouts(
    series: &OhlcvTimeSeries,
    levels: &LevelSet,
    settings: &BreakoutSettings,
) -> Vec<Breakout> {
    if series.is_empty() || levels.is_empty() {
        return Vec::new();
    }

    let mut breakouts = Vec::new();
    let window = recent_window(series, settings.lookback);

    for level in &levels.resistance {
        let reference = vec![level.price; window.len()];
        if let Some(breakout) = check_breakout(
            series,
            &window,
            &reference,
            BreakoutDirection::Bullish,
            BreakoutSource::Horizontal,
            level.strength,
            Some(level.touch_count),
            settings,
        ) {
            breakouts.push(breakout);
        }
    }

    for level in &levels.support {
        let reference = vec![level.price; window.len()];
        if let Some(breakout) = check_breakout(
            series,
            &window,
            &reference,
            BreakoutDirection::Bearish,
            BreakoutSource::Horizontal,
            level.strength,
            Some(level.touch_count),
            settings,
        ) {
            breakouts.push(breakout);
        }
    }

    sort_recent_first(&mut breakouts);
    breakouts
}

/// Run both detectors and merge their results, most recent first.
pub fn detect_breakouts(
    series: &OhlcvTimeSeries,
    trend_lines: &TrendLineSet,
    levels: &LevelSet,
    settings: &BreakoutSettings,
) -> Vec<Breakout> {
    let mut breakouts = detect_trend_line_breakouts(series, trend_lines, settings);
    breakouts.extend(detect_horizontal_breakouts(series, levels, settings));
    sort_recent_first(&mut breakouts);
    breakouts
}

/// Candle indices of the lookback window (the whole series when shorter).
struct RecentWindow {
    start: usize,
    len: usize,
}

impl RecentWindow {
    fn len(&self) -> usize {
        self.len
    }
}

fn recent_window(series: &OhlcvTimeSeries, lookback: usize) -> RecentWindow {
    let start = series.len().saturating_sub(lookback);
    RecentWindow {
        start,
        len: series.len() - start,
    }
}

#[allow(clippy::too_many_arguments)]
fn check_breakout(
    series: &OhlcvTimeSeries,
    window: &RecentWindow,
    reference: &[f64],
    direction: BreakoutDirection,
    source: BreakoutSource,
    strength: f64,
    touch_count: Option<usize>,
    settings: &BreakoutSettings,
) -> Option<Breakout> {
    let n = window.len();
    if n <= settings.confirmation_candles {
        return None;
    }

    let closes = &series.close_prices[window.start..window.start + n];

    // A close on the wrong side of the reference. Bullish breakouts need a
    // close below resistance before the run above; bearish the mirror.
    let violates = |close: f64, reference: f64| match direction {
        BreakoutDirection::Bullish => close < reference,
        BreakoutDirection::Bearish => close > reference,
    };

    // Latest violating candle among those early enough to leave room for a
    // full confirmation run behind it.
    let check_end = n - settings.confirmation_candles;
    let mut last_violation = None;
    for k in 0..check_end {
        if violates(closes[k], reference[k]) {
            last_violation = Some(k);
        }
    }
    let k = last_violation?;

    // Every candle after the violation must close on the breakout side, and
    // the run must be long enough to confirm.
    let run = &closes[k + 1..];
    let run_reference = &reference[k + 1..];
    let held = run
        .iter()
        .zip(run_reference.iter())
        .all(|(&close, &reference)| !violates(close, reference) && close != reference);
    if !held || run.len() < settings.confirmation_candles {
        return None;
    }

    let price = closes[k + 1];
    let reference_value = run_reference[0];
    if reference_value == 0.0 {
        return None;
    }

    let percentage_move = match direction {
        BreakoutDirection::Bullish => (price - reference_value) / reference_value,
        BreakoutDirection::Bearish => (reference_value - price) / reference_value,
    };
    if percentage_move < settings.min_percentage {
        return None;
    }

    Some(Breakout {
        timestamp_ms: series.timestamps_ms[window.start + k + 1],
        direction,
        source,
        reference_value,
        price,
        percentage_move,
        strength,
        touch_count,
        confirmed: true,
    })
}

fn sort_recent_first(breakouts: &mut [Breakout]) {
    breakouts.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
}
