//! Multi-timeframe alignment: per-timeframe trend, momentum and volatility
//! labels, plus an agreement check across the configured timeframe set.

use anyhow::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::analysis::confirmation::SignalConfirmer;
use crate::analysis::indicators::calculate_indicators;
use crate::data::MarketData;
use crate::domain::pair_interval::Timeframe;
use crate::models::indicators::IndicatorSeries;

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum TrendLabel {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum MomentumLabel {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum VolatilityLabel {
    High,
    Low,
    Normal,
}

/// Classification of one timeframe's indicator state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeframeSnapshot {
    pub trend: TrendLabel,
    pub momentum: MomentumLabel,
    pub volatility: VolatilityLabel,
}

/// Agreement check across the evaluated timeframes. Timeframes with no data
/// are skipped and simply absent from `timeframes`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MultiTimeframeAlignment {
    pub timeframes: Vec<(Timeframe, TimeframeSnapshot)>,
    pub aligned: bool,
}

/// Classify one timeframe from its indicator series. Returns `None` when
/// the series produced no snapshots.
pub fn classify_timeframe(indicators: &IndicatorSeries) -> Option<TimeframeSnapshot> {
    let latest = indicators.latest()?;

    let trend = {
        let up = latest
            .sma_20
            .zip(latest.sma_50)
            .map(|(s20, s50)| s20 > s50 && latest.close > s20)
            .unwrap_or(false);
        let down = latest
            .sma_20
            .zip(latest.sma_50)
            .map(|(s20, s50)| s20 < s50 && latest.close < s20)
            .unwrap_or(false);
        if up {
            TrendLabel::Bullish
        } else if down {
            TrendLabel::Bearish
        } else {
            TrendLabel::Neutral
        }
    };

    let momentum = if latest.macd > 0.0 && latest.macd_hist > 0.0 {
        MomentumLabel::Bullish
    } else if latest.macd < 0.0 && latest.macd_hist < 0.0 {
        MomentumLabel::Bearish
    } else {
        MomentumLabel::Neutral
    };

    // ATR against its own mean over the series; undefined ATR reads as
    // normal volatility.
    let volatility = match (latest.atr, indicators.mean_atr()) {
        (Some(atr), Some(mean)) if atr > mean * 1.5 => VolatilityLabel::High,
        (Some(atr), Some(mean)) if atr < mean * 0.5 => VolatilityLabel::Low,
        _ => VolatilityLabel::Normal,
    };

    Some(TimeframeSnapshot {
        trend,
        momentum,
        volatility,
    })
}

/// True when at least two evaluated timeframes share the same non-neutral
/// trend label, counted independently for bullish and bearish.
pub fn check_alignment(snapshots: &[(Timeframe, TimeframeSnapshot)]) -> bool {
    if snapshots.len() < 2 {
        return false;
    }

    let counts = snapshots
        .iter()
        .map(|(_, snapshot)| snapshot.trend)
        .counts();

    counts.get(&TrendLabel::Bullish).copied().unwrap_or(0) >= 2
        || counts.get(&TrendLabel::Bearish).copied().unwrap_or(0) >= 2
}

impl<S: MarketData> SignalConfirmer<S> {
    /// Classify every configured timeframe for a pair and check agreement.
    /// Timeframes with no data are skipped; an unknown pair propagates the
    /// collaborator's failure.
    pub fn multi_timeframe_confirmation(
        &self,
        pair_symbol: &str,
    ) -> Result<MultiTimeframeAlignment> {
        let mut timeframes = Vec::new();

        for timeframe in self.config.confirmation.alignment_timeframes {
            let series = self.data.get_series(
                pair_symbol,
                timeframe,
                self.config.confirmation.history_limit,
            )?;
            if series.is_empty() {
                log::info!("Skipping {} at {}: no data", pair_symbol, timeframe);
                continue;
            }

            let indicators = calculate_indicators(&series, &self.config.indicators);
            if let Some(snapshot) = classify_timeframe(&indicators) {
                timeframes.push((timeframe, snapshot));
            }
        }

        let aligned = check_alignment(&timeframes);
        Ok(MultiTimeframeAlignment {
            timeframes,
            aligned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(trend: TrendLabel) -> TimeframeSnapshot {
        TimeframeSnapshot {
            trend,
            momentum: MomentumLabel::Neutral,
            volatility: VolatilityLabel::Normal,
        }
    }

    #[test]
    fn test_two_bullish_timeframes_align() {
        let snapshots = vec![
            (Timeframe::H1, snapshot(TrendLabel::Bullish)),
            (Timeframe::H4, snapshot(TrendLabel::Bullish)),
            (Timeframe::D1, snapshot(TrendLabel::Neutral)),
        ];
        assert!(check_alignment(&snapshots));
    }

    #[test]
    fn test_split_trends_do_not_align() {
        let snapshots = vec![
            (Timeframe::H1, snapshot(TrendLabel::Bullish)),
            (Timeframe::H4, snapshot(TrendLabel::Bearish)),
            (Timeframe::D1, snapshot(TrendLabel::Neutral)),
        ];
        assert!(!check_alignment(&snapshots));
    }

    #[test]
    fn test_neutral_majority_does_not_align() {
        // Two neutral labels agree, but neutral never counts as alignment
        let snapshots = vec![
            (Timeframe::H1, snapshot(TrendLabel::Neutral)),
            (Timeframe::H4, snapshot(TrendLabel::Neutral)),
            (Timeframe::D1, snapshot(TrendLabel::Bullish)),
        ];
        assert!(!check_alignment(&snapshots));
    }

    #[test]
    fn test_single_timeframe_never_aligns() {
        let snapshots = vec![(Timeframe::H1, snapshot(TrendLabel::Bullish))];
        assert!(!check_alignment(&snapshots));
    }

    #[test]
    fn test_classify_empty_indicators() {
        assert!(classify_timeframe(&IndicatorSeries::default()).is_none());
    }

    #[test]
    fn test_alignment_through_the_collaborator() {
        use crate::data::TimeSeriesCollection;
        use crate::domain::candle::Candle;
        use crate::domain::pair_interval::PairInterval;
        use crate::models::timeseries::OhlcvTimeSeries;

        fn rising_series(timeframe: Timeframe) -> OhlcvTimeSeries {
            let candles: Vec<Candle> = (0..60)
                .map(|i| {
                    let close = 1.2 + i as f64 * 0.001;
                    Candle::new(i as i64 * timeframe.interval_ms(), close, close, close, close, 1.0)
                })
                .collect();
            OhlcvTimeSeries::from_candles(PairInterval::new("EURUSD", timeframe), &candles)
        }

        // Bullish on 1h and 4h, no daily data at all: still aligned
        let mut store = TimeSeriesCollection::new();
        store.add_series(rising_series(Timeframe::H1)).unwrap();
        store.add_series(rising_series(Timeframe::H4)).unwrap();

        let confirmer = SignalConfirmer::new(store);
        let alignment = confirmer.multi_timeframe_confirmation("EURUSD").unwrap();

        assert_eq!(alignment.timeframes.len(), 2);
        assert!(
            alignment
                .timeframes
                .iter()
                .all(|(_, s)| s.trend == TrendLabel::Bullish)
        );
        assert!(alignment.aligned);

        assert!(confirmer.multi_timeframe_confirmation("GBPUSD").is_err());
    }
}
