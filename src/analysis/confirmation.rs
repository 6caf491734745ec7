//! Signal confirmation: adjusts a pattern detection's confidence using
//! indicator state, volume behaviour and a false-breakout check.

use anyhow::Result;
use statrs::statistics::Statistics;

use crate::analysis::indicators::calculate_indicators;
use crate::config::{ANALYSIS, AnalysisConfig};
use crate::data::MarketData;
use crate::models::indicators::IndicatorSeries;
use crate::models::pattern::{
    ConfirmationResult, DetectionStatus, PatternDetection, PatternType,
};
use crate::models::timeseries::OhlcvTimeSeries;
use crate::utils::maths_utils::{get_max, get_min};

/// Confirms or rejects pattern detections against the pair's indicator
/// state. The data collaborator is injected at construction and is the only
/// source of history this engine sees.
pub struct SignalConfirmer<S: MarketData> {
    pub(crate) data: S,
    pub(crate) config: AnalysisConfig,
}

impl<S: MarketData> SignalConfirmer<S> {
    pub fn new(data: S) -> Self {
        Self::with_config(data, ANALYSIS)
    }

    pub fn with_config(data: S, config: AnalysisConfig) -> Self {
        Self { data, config }
    }

    /// Run the confirmation rules for one detection at the default
    /// confidence threshold.
    pub fn confirm_pattern(&self, detection: &PatternDetection) -> Result<ConfirmationResult> {
        self.confirm_pattern_with_threshold(
            detection,
            self.config.confirmation.confidence_threshold,
        )
    }

    /// Run the confirmation rules for one detection. A pair with no usable
    /// history yields the zero-confidence "insufficient data" result, not an
    /// error; an unknown pair propagates the collaborator's failure.
    pub fn confirm_pattern_with_threshold(
        &self,
        detection: &PatternDetection,
        confidence_threshold: f64,
    ) -> Result<ConfirmationResult> {
        let series = self.data.get_series(
            &detection.pair_symbol,
            self.config.confirmation.timeframe,
            self.config.confirmation.history_limit,
        )?;

        if series.is_empty() {
            return Ok(ConfirmationResult::insufficient_data());
        }

        let indicators = calculate_indicators(&series, &self.config.indicators);
        Ok(evaluate_confirmation(
            detection,
            &series,
            &indicators,
            confidence_threshold,
        ))
    }

    /// Retrieve all active detections from the collaborator, confirm each
    /// against `min_confidence`, and return the confirmed ones with their
    /// results, in the collaborator's native order.
    pub fn filter_signals(
        &self,
        min_confidence: f64,
    ) -> Result<Vec<(PatternDetection, ConfirmationResult)>> {
        let detections = self.data.get_active_detections()?;
        let total = detections.len();
        let mut confirmed = Vec::new();

        for detection in detections {
            let result = self.confirm_pattern_with_threshold(&detection, min_confidence)?;
            if result.confirmed {
                confirmed.push((detection, result));
            }
        }

        log::info!(
            "{} of {} active detections confirmed at threshold {}",
            confirmed.len(),
            total,
            min_confidence
        );
        Ok(confirmed)
    }

    /// Persist a status change through the collaborator, typically after the
    /// caller has acted on a confirmation.
    pub fn update_detection_status(
        &mut self,
        detection_id: i64,
        status: DetectionStatus,
        notes: Option<&str>,
    ) -> Result<()> {
        self.data.update_detection_status(detection_id, status, notes)
    }
}

/// The pure rule sequence, separated from data access for testability.
/// Rules run in a fixed order and each appends a human-readable reason.
pub fn evaluate_confirmation(
    detection: &PatternDetection,
    series: &OhlcvTimeSeries,
    indicators: &IndicatorSeries,
    confidence_threshold: f64,
) -> ConfirmationResult {
    let mut confidence = detection.base_confidence;
    let mut reasons: Vec<String> = Vec::new();

    let Some(latest) = indicators.latest() else {
        return ConfirmationResult::insufficient_data();
    };

    // 1. Trend check for continuation patterns
    if detection.pattern_type == PatternType::Continuation {
        let uptrend = latest
            .sma_20
            .zip(latest.sma_50)
            .map(|(s20, s50)| s20 > s50 && latest.close > s20)
            .unwrap_or(false);
        let downtrend = latest
            .sma_20
            .zip(latest.sma_50)
            .map(|(s20, s50)| s20 < s50 && latest.close < s20)
            .unwrap_or(false);

        if uptrend {
            confidence += 10.0;
            reasons.push("Uptrend confirmed by moving averages".to_string());
        } else if downtrend {
            confidence += 10.0;
            reasons.push("Downtrend confirmed by moving averages".to_string());
        } else {
            confidence -= 10.0;
            reasons.push("Trend not confirmed by moving averages".to_string());
        }
    }

    // 2./3. Exhaustion checks for reversal patterns
    if detection.pattern_type == PatternType::Reversal {
        let name = detection.pattern_name.to_lowercase();

        if name.contains("top") {
            if latest.rsi.map(|rsi| rsi > 70.0).unwrap_or(false) {
                confidence += 10.0;
                reasons.push("Overbought conditions confirmed by RSI".to_string());
            }
            if latest.bb_upper.map(|bb| latest.close > bb).unwrap_or(false) {
                confidence += 10.0;
                reasons.push("Price above upper Bollinger Band".to_string());
            }
            if latest.macd_hist < 0.0 && latest.macd < 0.0 {
                confidence += 10.0;
                reasons.push("Bearish momentum confirmed by MACD".to_string());
            }
        } else if name.contains("bottom") || name.contains("inverse") {
            if latest.rsi.map(|rsi| rsi < 30.0).unwrap_or(false) {
                confidence += 10.0;
                reasons.push("Oversold conditions confirmed by RSI".to_string());
            }
            if latest.bb_lower.map(|bb| latest.close < bb).unwrap_or(false) {
                confidence += 10.0;
                reasons.push("Price below lower Bollinger Band".to_string());
            }
            if latest.macd_hist > 0.0 && latest.macd > 0.0 {
                confidence += 10.0;
                reasons.push("Bullish momentum confirmed by MACD".to_string());
            }
        }
    }

    // 4. Volume confirmation: last five candles against the five before
    let len = series.len();
    let recent = &series.volumes[len.saturating_sub(5)..];
    let previous = &series.volumes[len.saturating_sub(10)..len.saturating_sub(5)];
    let volume_rising = !previous.is_empty()
        && !recent.is_empty()
        && recent.mean() > previous.mean() * 1.2;

    if volume_rising {
        confidence += 10.0;
        reasons.push("Increasing volume confirms pattern".to_string());
    } else {
        confidence -= 5.0;
        reasons.push("Volume not confirming pattern".to_string());
    }

    // 5. False-breakout check, only when both anchor prices are known
    if let (Some(entry), Some(target)) = (detection.price_at_detection, detection.target_price) {
        let recent_highs = &series.high_prices[len.saturating_sub(5)..];
        let recent_lows = &series.low_prices[len.saturating_sub(5)..];

        // Price poked through in the expected direction but closed back on
        // the wrong side of the detection price.
        if target > entry && get_max(recent_highs) > entry && latest.close < entry {
            confidence -= 20.0;
            reasons.push("Possible false breakout detected".to_string());
        } else if target < entry && get_min(recent_lows) < entry && latest.close > entry {
            confidence -= 20.0;
            reasons.push("Possible false breakout detected".to_string());
        }
    }

    ConfirmationResult {
        confirmed: confidence >= confidence_threshold,
        confidence,
        reasons,
    }
}
