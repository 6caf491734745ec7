//! Swing point extraction: local price extrema over a symmetric window.

use crate::models::geometry::{SwingKind, SwingPoint};
use crate::models::timeseries::OhlcvTimeSeries;
use crate::utils::maths_utils::{get_max, get_min};

/// Identify swing highs and lows in a series.
///
/// An index `i` with `window <= i < len - window` is a swing high when its
/// high equals the maximum high over `[i - window, i + window]` (ties count,
/// so a flat top marks every touching candle), and a swing low when its low
/// equals the window minimum. Returns `(swing_highs, swing_lows)` in time
/// order; an empty or too-short series yields two empty vectors.
pub fn identify_swing_points(
    series: &OhlcvTimeSeries,
    window: usize,
) -> (Vec<SwingPoint>, Vec<SwingPoint>) {
    let len = series.len();
    let mut swing_highs = Vec::new();
    let mut swing_lows = Vec::new();

    if len < 2 * window + 1 {
        return (swing_highs, swing_lows);
    }

    for i in window..len - window {
        let lo = i - window;
        let hi = i + window + 1; // exclusive

        if series.high_prices[i] == get_max(&series.high_prices[lo..hi]) {
            swing_highs.push(SwingPoint {
                timestamp_ms: series.timestamps_ms[i],
                elapsed_secs: series.elapsed_seconds(i),
                price: series.high_prices[i],
                kind: SwingKind::High,
            });
        }

        if series.low_prices[i] == get_min(&series.low_prices[lo..hi]) {
            swing_lows.push(SwingPoint {
                timestamp_ms: series.timestamps_ms[i],
                elapsed_secs: series.elapsed_seconds(i),
                price: series.low_prices[i],
                kind: SwingKind::Low,
            });
        }
    }

    (swing_highs, swing_lows)
}
