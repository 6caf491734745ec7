//! Horizontal support/resistance detection via sliding-window price
//! clustering.

use crate::config::analysis::LevelSettings;
use crate::models::geometry::{HorizontalLevel, LevelKind, LevelSet};
use crate::models::timeseries::OhlcvTimeSeries;

/// Identify horizontal support and resistance levels.
///
/// Support levels are clustered from candle lows, resistance levels from
/// candle highs. Both lists come back sorted by strength descending. Empty
/// series yields an empty set.
pub fn identify_support_resistance_levels(
    series: &OhlcvTimeSeries,
    settings: &LevelSettings,
) -> LevelSet {
    if series.is_empty() {
        return LevelSet::default();
    }

    let high_clusters = find_price_clusters(&series.high_prices, settings);
    let low_clusters = find_price_clusters(&series.low_prices, settings);

    LevelSet {
        support: build_levels(series, low_clusters, LevelKind::Support, settings),
        resistance: build_levels(series, high_clusters, LevelKind::Resistance, settings),
    }
}

/// Find clusters of prices that could act as support or resistance.
///
/// Every price in every sliding window is a candidate: it becomes a cluster
/// when at least 3 window prices lie within the relative threshold of it.
/// Candidates are then merged into an insertion-ordered list, replacing a
/// nearby entry with the count-weighted average (re-inserted at the tail).
/// Returns `(price, accumulated_count)` pairs.
fn find_price_clusters(prices: &[f64], settings: &LevelSettings) -> Vec<(f64, usize)> {
    let window = settings.window;
    let threshold = settings.threshold;
    let mut clusters: Vec<(f64, usize)> = Vec::new();

    if prices.len() >= window {
        for window_prices in prices.windows(window) {
            for &price in window_prices {
                if price == 0.0 {
                    continue;
                }

                let count = window_prices
                    .iter()
                    .filter(|&&p| ((p - price) / price).abs() < threshold)
                    .count();

                if count >= 3 {
                    clusters.push((price, count));
                }
            }
        }
    }

    // Merge similar clusters
    let mut merged: Vec<(f64, usize)> = Vec::new();
    for (price, count) in clusters {
        let existing_idx = merged
            .iter()
            .position(|&(existing, _)| ((price - existing) / existing).abs() < threshold);

        match existing_idx {
            Some(idx) => {
                let (existing, existing_count) = merged.remove(idx);
                let total = existing_count + count;
                let weighted =
                    (existing * existing_count as f64 + price * count as f64) / total as f64;
                merged.push((weighted, total));
            }
            None => merged.push((price, count)),
        }
    }

    merged
}

/// Turn merged clusters into levels, deduplicating near-identical prices
/// (the higher-strength entry wins) and counting bounce-style touches.
fn build_levels(
    series: &OhlcvTimeSeries,
    clusters: Vec<(f64, usize)>,
    kind: LevelKind,
    settings: &LevelSettings,
) -> Vec<HorizontalLevel> {
    let threshold = settings.threshold;
    let mut levels: Vec<HorizontalLevel> = Vec::new();

    for (price, count) in clusters {
        let strength = count as f64;
        let duplicate = levels
            .iter_mut()
            .find(|level| ((price - level.price) / level.price).abs() < threshold);

        match duplicate {
            Some(existing) => {
                if strength > existing.strength {
                    *existing = HorizontalLevel {
                        kind,
                        price,
                        strength,
                        touch_count: count_touches(series, price, kind, threshold),
                    };
                }
            }
            None => levels.push(HorizontalLevel {
                kind,
                price,
                strength,
                touch_count: count_touches(series, price, kind, threshold),
            }),
        }
    }

    levels.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    levels
}

/// Count how many candles bounced off a level: for support, a low entering
/// the threshold band while the close stays above the level; for resistance
/// the mirror with highs and closes below.
fn count_touches(series: &OhlcvTimeSeries, level: f64, kind: LevelKind, threshold: f64) -> usize {
    let upper_band = level * (1.0 + threshold);
    let lower_band = level * (1.0 - threshold);
    let mut touches = 0;

    for i in 1..series.len() {
        let hit = match kind {
            LevelKind::Support => {
                series.low_prices[i] < upper_band
                    && series.low_prices[i] > lower_band
                    && series.close_prices[i] > level
            }
            LevelKind::Resistance => {
                series.high_prices[i] > lower_band
                    && series.high_prices[i] < upper_band
                    && series.close_prices[i] < level
            }
        };
        if hit {
            touches += 1;
        }
    }

    touches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::{PairInterval, Timeframe};

    fn settings(window: usize) -> LevelSettings {
        LevelSettings {
            window,
            threshold: 0.0005,
        }
    }

    fn series_from_ohlc(rows: &[(f64, f64, f64, f64)]) -> OhlcvTimeSeries {
        let candles: Vec<Candle> = rows
            .iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| Candle::new(i as i64 * 3_600_000, o, h, l, c, 1.0))
            .collect();
        OhlcvTimeSeries::from_candles(PairInterval::new("EURUSD", Timeframe::H1), &candles)
    }

    #[test]
    fn test_repeated_extreme_forms_a_cluster() {
        // Ten lows pinned near 1.1000 inside one window
        let prices = [
            1.1000, 1.1001, 1.0999, 1.1000, 1.1002, 1.0998, 1.1001, 1.1000, 1.0999, 1.1001,
        ];
        let clusters = find_price_clusters(&prices, &settings(10));
        assert_eq!(clusters.len(), 1);

        let (price, count) = clusters[0];
        assert!((price - 1.1000).abs() < 0.001);
        assert!(count >= 3);
    }

    #[test]
    fn test_spread_prices_form_no_cluster() {
        // Every price more than 0.05% from every other
        let prices = [1.10, 1.12, 1.14, 1.16, 1.18, 1.20, 1.22, 1.24, 1.26, 1.28];
        assert!(find_price_clusters(&prices, &settings(10)).is_empty());
    }

    #[test]
    fn test_merge_is_count_weighted() {
        let mut prices = vec![1.1000; 5];
        prices.extend(vec![1.10005; 5]);
        let clusters = find_price_clusters(&prices, &settings(10));

        assert_eq!(clusters.len(), 1);
        let (price, _) = clusters[0];
        assert!(price > 1.1000 && price < 1.10005);
    }

    #[test]
    fn test_support_touches_count_bounces() {
        // Lows repeatedly probe 1.1000 while closes hold above it
        let rows: Vec<(f64, f64, f64, f64)> = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    (1.1010, 1.1020, 1.1000, 1.1012) // touch and bounce
                } else {
                    (1.1012, 1.1025, 1.1008, 1.1015)
                }
            })
            .collect();
        let series = series_from_ohlc(&rows);

        // Touch counting starts at candle 1, so two of the three probing
        // candles register.
        let touches = count_touches(&series, 1.09999, LevelKind::Support, 0.0005);
        assert_eq!(touches, 2);
    }

    #[test]
    fn test_levels_sorted_by_strength() {
        // One tight cluster of lows and one looser cluster, all in a single
        // window so both emerge as levels.
        let mut rows: Vec<(f64, f64, f64, f64)> = Vec::new();
        for _ in 0..12 {
            rows.push((1.2010, 1.2020, 1.2000, 1.2012));
        }
        for _ in 0..6 {
            rows.push((1.3010, 1.3020, 1.3000, 1.3012));
        }
        let series = series_from_ohlc(&rows);

        let levels = identify_support_resistance_levels(
            &series,
            &LevelSettings {
                window: 18,
                threshold: 0.0005,
            },
        );
        assert!(levels.support.len() >= 2);
        for pair in levels.support.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
    }

    #[test]
    fn test_empty_series() {
        let series = series_from_ohlc(&[]);
        let levels = identify_support_resistance_levels(&series, &settings(20));
        assert!(levels.is_empty());
    }
}
