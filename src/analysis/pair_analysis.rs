//! Per-pair breakout analysis: swing points -> trend lines and horizontal
//! levels -> breakout detection, composed over the injected data
//! collaborator.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::breakout::detect_breakouts;
use crate::analysis::levels::identify_support_resistance_levels;
use crate::analysis::swing_points::identify_swing_points;
use crate::analysis::trend_lines::find_trend_lines;
use crate::config::{ANALYSIS, AnalysisConfig};
use crate::data::MarketData;
use crate::models::breakout::Breakout;
use crate::models::geometry::{LevelSet, TrendLineSet};
use crate::domain::pair_interval::Timeframe;
use crate::utils::TimeUtils;

/// Complete analysis output for one pair at one timeframe.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnalysisReport {
    pub pair_symbol: String,
    pub timeframe: Timeframe,
    pub analysis_time: String,
    pub trend_lines: TrendLineSet,
    pub support_resistance_levels: LevelSet,
    pub breakouts: Vec<Breakout>,
    pub latest_price: f64,
    pub latest_timestamp_ms: i64,
}

/// Outcome of an analysis call: either a full report or an explicit marker
/// that the pair had no history at the requested timeframe. Callers degrade
/// gracefully on the latter; it is not an error.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum PairAnalysis {
    Report(Box<AnalysisReport>),
    InsufficientData {
        pair_symbol: String,
        timeframe: Timeframe,
    },
}

impl PairAnalysis {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            PairAnalysis::Report(report) => Some(report),
            PairAnalysis::InsufficientData { .. } => None,
        }
    }
}

/// Runs the full breakout pipeline for a pair. The data collaborator is
/// injected at construction; every analysis pass is a pure function of the
/// series it returns and the configuration.
pub struct BreakoutAnalyzer<S: MarketData> {
    data: S,
    config: AnalysisConfig,
}

impl<S: MarketData> BreakoutAnalyzer<S> {
    pub fn new(data: S) -> Self {
        Self::with_config(data, ANALYSIS)
    }

    pub fn with_config(data: S, config: AnalysisConfig) -> Self {
        Self { data, config }
    }

    /// Perform complete breakout analysis for a currency pair. An unknown
    /// pair propagates the collaborator's failure unmodified; a known pair
    /// with no candles yields [`PairAnalysis::InsufficientData`].
    pub fn analyze(&self, pair_symbol: &str, timeframe: Timeframe) -> Result<PairAnalysis> {
        let series = self
            .data
            .get_series(pair_symbol, timeframe, self.config.history_limit)?;

        if series.is_empty() {
            log::warn!("No historical data for {} at {}", pair_symbol, timeframe);
            return Ok(PairAnalysis::InsufficientData {
                pair_symbol: pair_symbol.to_string(),
                timeframe,
            });
        }

        let (swing_highs, swing_lows) = identify_swing_points(&series, self.config.swing.window);

        let trend_lines =
            find_trend_lines(&series, &swing_highs, &swing_lows, &self.config.trend_line);
        let levels = identify_support_resistance_levels(&series, &self.config.levels);
        let breakouts = detect_breakouts(&series, &trend_lines, &levels, &self.config.breakout);

        log::info!(
            "{} at {}: {} swing highs, {} swing lows, {} resistance / {} support lines, {} levels, {} breakouts",
            pair_symbol,
            timeframe,
            swing_highs.len(),
            swing_lows.len(),
            trend_lines.resistance.len(),
            trend_lines.support.len(),
            levels.support.len() + levels.resistance.len(),
            breakouts.len()
        );

        Ok(PairAnalysis::Report(Box::new(AnalysisReport {
            pair_symbol: pair_symbol.to_string(),
            timeframe,
            analysis_time: Utc::now().format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
            trend_lines,
            support_resistance_levels: levels,
            breakouts,
            latest_price: series.latest_close().unwrap_or_default(),
            latest_timestamp_ms: series.latest_timestamp_ms().unwrap_or_default(),
        })))
    }

    /// Hand a detected breakout to the storage collaborator, which assigns
    /// and returns its identity.
    pub fn persist_breakout(&mut self, breakout: &Breakout, pair_symbol: &str) -> Result<i64> {
        self.data.persist_breakout(breakout, pair_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeSeriesCollection;
    use crate::domain::candle::Candle;
    use crate::domain::pair_interval::PairInterval;
    use crate::models::breakout::BreakoutDirection;
    use crate::models::timeseries::OhlcvTimeSeries;

    const HOUR_MS: i64 = 3_600_000;

    /// A series that oscillates under a ceiling near 1.2050, repeatedly
    /// rejecting it, then closes above it for the final three candles.
    fn breakout_series() -> OhlcvTimeSeries {
        let mut candles = Vec::new();
        let ceiling = 1.2050;

        for i in 0..60 {
            let phase = (i % 8) as f64 / 8.0;
            let close = 1.1950 + 0.008 * phase;
            let high = if i % 8 == 7 { ceiling } else { close + 0.002 };
            candles.push(Candle::new(
                i as i64 * HOUR_MS,
                close - 0.001,
                high,
                close - 0.003,
                close,
                100.0,
            ));
        }
        // Confirmed push through the ceiling
        for (j, close) in [1.2080, 1.2095, 1.2110].iter().enumerate() {
            let i = 60 + j as i64;
            candles.push(Candle::new(
                i * HOUR_MS,
                close - 0.002,
                close + 0.002,
                close - 0.004,
                *close,
                180.0,
            ));
        }

        OhlcvTimeSeries::from_candles(PairInterval::new("EURUSD", Timeframe::H1), &candles)
    }

    fn store_with(series: OhlcvTimeSeries) -> TimeSeriesCollection {
        let mut store = TimeSeriesCollection::new();
        store.add_series(series).unwrap();
        store
    }

    #[test]
    fn test_analyze_emits_report_with_breakout() {
        let analyzer = BreakoutAnalyzer::new(store_with(breakout_series()));
        let analysis = analyzer.analyze("EURUSD", Timeframe::H1).unwrap();

        let report = analysis.report().expect("expected a full report");
        assert_eq!(report.pair_symbol, "EURUSD");
        assert!((report.latest_price - 1.2110).abs() < 1e-12);
        assert_eq!(report.latest_timestamp_ms, 62 * HOUR_MS);

        assert!(
            !report.support_resistance_levels.resistance.is_empty(),
            "repeated ceiling rejections should cluster into resistance"
        );
        assert!(
            report
                .breakouts
                .iter()
                .any(|b| b.direction == BreakoutDirection::Bullish && b.confirmed),
            "the final push through the ceiling should register as a bullish breakout"
        );

        // Most recent first
        for pair in report.breakouts.windows(2) {
            assert!(pair[0].timestamp_ms >= pair[1].timestamp_ms);
        }
    }

    #[test]
    fn test_analyze_unknown_pair_propagates_error() {
        let analyzer = BreakoutAnalyzer::new(store_with(breakout_series()));
        assert!(analyzer.analyze("GBPUSD", Timeframe::H1).is_err());
    }

    #[test]
    fn test_analyze_empty_timeframe_is_insufficient_data() {
        let analyzer = BreakoutAnalyzer::new(store_with(breakout_series()));
        let analysis = analyzer.analyze("EURUSD", Timeframe::D1).unwrap();
        assert!(analysis.report().is_none());
    }

    #[test]
    fn test_detected_breakouts_can_be_persisted() {
        let mut store = store_with(breakout_series());
        let mut analyzer = BreakoutAnalyzer::new(&mut store);
        let analysis = analyzer.analyze("EURUSD", Timeframe::H1).unwrap();

        let breakouts = analysis.report().unwrap().breakouts.clone();
        assert!(!breakouts.is_empty());
        for breakout in &breakouts {
            analyzer.persist_breakout(breakout, "EURUSD").unwrap();
        }

        drop(analyzer);
        assert_eq!(store.breakouts.len(), breakouts.len());
    }
}
