//! Indicator engine: SMA, RSI, MACD, Bollinger Bands and ATR per candle.
//!
//! Everything is recomputed fresh per call from the raw series; there is no
//! incremental state. A `None` field means the rolling window has not
//! filled yet.

use statrs::statistics::Statistics;

use crate::config::analysis::IndicatorSettings;
use crate::models::indicators::{IndicatorSeries, IndicatorSnapshot};
use crate::models::timeseries::OhlcvTimeSeries;

/// Compute indicator snapshots for every candle of the series. Empty series
/// yields an empty result.
pub fn calculate_indicators(
    series: &OhlcvTimeSeries,
    settings: &IndicatorSettings,
) -> IndicatorSeries {
    let len = series.len();
    if len == 0 {
        return IndicatorSeries::default();
    }

    let closes = &series.close_prices;

    let sma_short = rolling_mean(closes, settings.sma_short);
    let sma_medium = rolling_mean(closes, settings.sma_medium);
    let sma_long = rolling_mean(closes, settings.sma_long);

    let rsi = relative_strength_index(closes, settings.rsi_period);

    let ema_fast = exponential_mean(closes, settings.macd_fast);
    let ema_slow = exponential_mean(closes, settings.macd_slow);
    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(fast, slow)| fast - slow)
        .collect();
    let macd_signal = exponential_mean(&macd, settings.macd_signal);

    let bb_middle = rolling_mean(closes, settings.bollinger_period);
    let bb_std = rolling_std(closes, settings.bollinger_period);

    let atr = average_true_range(series, settings.atr_period);

    let snapshots = (0..len)
        .map(|i| {
            let band = bb_middle[i].zip(bb_std[i]);
            IndicatorSnapshot {
                close: closes[i],
                volume: series.volumes[i],
                sma_20: sma_short[i],
                sma_50: sma_medium[i],
                sma_200: sma_long[i],
                rsi: rsi[i],
                macd: macd[i],
                macd_signal: macd_signal[i],
                macd_hist: macd[i] - macd_signal[i],
                bb_upper: band.map(|(mid, std)| mid + settings.bollinger_width * std),
                bb_middle: bb_middle[i],
                bb_lower: band.map(|(mid, std)| mid - settings.bollinger_width * std),
                atr: atr[i],
            }
        })
        .collect();

    IndicatorSeries { snapshots }
}

/// Simple mean over a trailing window; undefined until the window fills.
fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| window.mean())
}

/// Sample standard deviation (n - 1 denominator) over a trailing window.
fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| window.std_dev())
}

fn rolling(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i + 1 >= period {
                Some(f(&values[i + 1 - period..=i]))
            } else {
                None
            }
        })
        .collect()
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`,
/// seeded at the first value. Defined from the first candle onward.
fn exponential_mean(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = match values.first() {
        Some(&first) => first,
        None => return out,
    };
    out.push(current);
    for &value in &values[1..] {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(current);
    }
    out
}

/// RSI over rolling simple means of gains and losses.
///
/// When the average loss is zero the textbook formula divides by zero: with
/// gains present the result is pinned to 100 (the limit of the formula);
/// with a completely flat window it is pinned to 50, since a series that
/// moved nowhere carries no momentum signal either way.
fn relative_strength_index(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let len = closes.len();
    let mut gains = vec![0.0; len];
    let mut losses = vec![0.0; len];
    for i in 1..len {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    (0..len)
        .map(|i| {
            // The first delta exists at index 1, so the window of `period`
            // deltas first fills at index `period`.
            if i < period {
                return None;
            }
            let avg_gain = gains[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[i + 1 - period..=i].iter().sum::<f64>() / period as f64;

            let rsi = if avg_loss == 0.0 {
                if avg_gain == 0.0 { 50.0 } else { 100.0 }
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - 100.0 / (1.0 + rs)
            };
            Some(rsi)
        })
        .collect()
}

/// ATR: rolling simple mean of the true range. The first candle has no
/// previous close, so its true range is just high - low.
fn average_true_range(series: &OhlcvTimeSeries, period: usize) -> Vec<Option<f64>> {
    let true_ranges: Vec<f64> = (0..series.len())
        .map(|i| {
            let prev_close = if i > 0 {
                Some(series.close_prices[i - 1])
            } else {
                None
            };
            series.get_candle(i).true_range(prev_close)
        })
        .collect();
    rolling_mean(&true_ranges, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::{PairInterval, Timeframe};

    fn series_from_closes(closes: &[f64]) -> OhlcvTimeSeries {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::new(i as i64 * 3_600_000, c, c, c, c, 1.0))
            .collect();
        OhlcvTimeSeries::from_candles(PairInterval::new("EURUSD", Timeframe::H1), &candles)
    }

    #[test]
    fn test_constant_series_collapses_everything() {
        let series = series_from_closes(&[1.25; 250]);
        let indicators = calculate_indicators(&series, &ANALYSIS.indicators);
        let latest = indicators.latest().unwrap();

        assert_eq!(latest.sma_20, Some(1.25));
        assert_eq!(latest.sma_50, Some(1.25));
        assert_eq!(latest.sma_200, Some(1.25));
        assert_eq!(latest.atr, Some(0.0));
        assert_eq!(latest.bb_upper, Some(1.25));
        assert_eq!(latest.bb_middle, Some(1.25));
        assert_eq!(latest.bb_lower, Some(1.25));
        assert_eq!(latest.macd, 0.0);
        assert_eq!(latest.macd_hist, 0.0);
        // Flat window: the documented momentum-neutral sentinel
        assert_eq!(latest.rsi, Some(50.0));
    }

    #[test]
    fn test_windows_stay_undefined_until_filled() {
        let series = series_from_closes(&[1.0; 30]);
        let indicators = calculate_indicators(&series, &ANALYSIS.indicators);

        assert_eq!(indicators.snapshots[18].sma_20, None);
        assert!(indicators.snapshots[19].sma_20.is_some());
        assert_eq!(indicators.snapshots[13].rsi, None);
        assert!(indicators.snapshots[14].rsi.is_some());
        assert_eq!(indicators.snapshots[12].atr, None);
        assert!(indicators.snapshots[13].atr.is_some());
        assert!(indicators.latest().unwrap().sma_50.is_none());
    }

    #[test]
    fn test_rsi_extremes() {
        // Strictly rising closes: no losses, RSI pinned to 100
        let rising: Vec<f64> = (0..30).map(|i| 1.0 + i as f64 * 0.01).collect();
        let indicators = calculate_indicators(&series_from_closes(&rising), &ANALYSIS.indicators);
        assert_eq!(indicators.latest().unwrap().rsi, Some(100.0));

        // Strictly falling closes: no gains, RSI at 0
        let falling: Vec<f64> = (0..30).map(|i| 2.0 - i as f64 * 0.01).collect();
        let indicators = calculate_indicators(&series_from_closes(&falling), &ANALYSIS.indicators);
        let rsi = indicators.latest().unwrap().rsi.unwrap();
        assert!(rsi.abs() < 1e-9);
    }

    #[test]
    fn test_sma_tracks_window_mean() {
        let closes: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let indicators = calculate_indicators(&series_from_closes(&closes), &ANALYSIS.indicators);

        // Mean of 5..=24 is 14.5
        let sma = indicators.latest().unwrap().sma_20.unwrap();
        assert!((sma - 14.5).abs() < 1e-9);
    }

    #[test]
    fn test_ema_seeds_at_first_close() {
        let values = [10.0, 13.0];
        let ema = exponential_mean(&values, 3);
        assert_eq!(ema[0], 10.0);
        // alpha = 0.5: 0.5 * 13 + 0.5 * 10
        assert!((ema[1] - 11.5).abs() < 1e-12);
    }

    #[test]
    fn test_atr_sees_gaps() {
        // Second candle gaps up: true range measured from previous close
        let candles = vec![
            Candle::new(0, 1.00, 1.01, 0.99, 1.00, 1.0),
            Candle::new(3_600_000, 1.05, 1.06, 1.04, 1.05, 1.0),
        ];
        let series =
            OhlcvTimeSeries::from_candles(PairInterval::new("EURUSD", Timeframe::H1), &candles);
        let atr = average_true_range(&series, 2);

        assert_eq!(atr[0], None);
        // tr = [0.02, 1.06 - 1.00] -> mean 0.04
        assert!((atr[1].unwrap() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let indicators =
            calculate_indicators(&series_from_closes(&[]), &ANALYSIS.indicators);
        assert!(indicators.is_empty());
        assert!(indicators.latest().is_none());
        assert!(indicators.mean_atr().is_none());
    }
}
