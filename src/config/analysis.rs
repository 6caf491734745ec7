//! Analysis and computation configuration

use crate::domain::pair_interval::Timeframe;

/// Settings for swing point extraction
#[derive(Debug, Clone)]
pub struct SwingSettings {
    // Symmetric neighbourhood half-width for local extrema detection
    pub window: usize,
}

/// Settings for trend line fitting
#[derive(Debug, Clone)]
pub struct TrendLineSettings {
    // Minimum number of swing points to form a trend line
    pub min_points: usize,
    // Maximum distance from point to line, relative to the point's price
    pub max_distance: f64,
}

/// Settings for horizontal support/resistance clustering
#[derive(Debug, Clone)]
pub struct LevelSettings {
    // Sliding window width for price clustering
    pub window: usize,
    // Relative tolerance for cluster membership, merging and touch bands
    pub threshold: f64,
}

/// Settings for breakout detection
#[derive(Debug, Clone)]
pub struct BreakoutSettings {
    // Number of recent candles inspected for a breakout
    pub lookback: usize,
    // Closes required on the breakout side beyond the crossing candle
    pub confirmation_candles: usize,
    // Minimum percentage move for a valid breakout
    pub min_percentage: f64,
}

/// Settings for the indicator engine.
///
/// RSI edge case: when the rolling average loss is zero the textbook formula
/// divides by zero. With gains present the engine reports 100.0 (the limit of
/// the formula); with a flat window (no gains either) it reports 50.0.
#[derive(Debug, Clone)]
pub struct IndicatorSettings {
    pub sma_short: usize,
    pub sma_medium: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_width: f64,
    pub atr_period: usize,
}

/// Settings for pattern confirmation and multi-timeframe alignment
#[derive(Debug, Clone)]
pub struct ConfirmationSettings {
    // Confidence needed for a pattern to count as confirmed
    pub confidence_threshold: f64,
    // Candles fetched for confirmation and alignment checks
    pub history_limit: usize,
    // Timeframe used for single-pattern confirmation
    pub timeframe: Timeframe,
    // Timeframes evaluated by the multi-timeframe aligner
    pub alignment_timeframes: [Timeframe; 3],
}

/// The Master Analysis Configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Candles fetched for a breakout analysis pass
    pub history_limit: usize,

    // Sub-groups
    pub swing: SwingSettings,
    pub trend_line: TrendLineSettings,
    pub levels: LevelSettings,
    pub breakout: BreakoutSettings,
    pub indicators: IndicatorSettings,
    pub confirmation: ConfirmationSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    history_limit: 200,

    swing: SwingSettings { window: 5 },

    trend_line: TrendLineSettings {
        min_points: 3,
        max_distance: 0.0015,
    },

    levels: LevelSettings {
        window: 20,
        threshold: 0.0005,
    },

    breakout: BreakoutSettings {
        lookback: 5,
        confirmation_candles: 2,
        min_percentage: 0.001,
    },

    indicators: IndicatorSettings {
        sma_short: 20,
        sma_medium: 50,
        sma_long: 200,
        rsi_period: 14,
        macd_fast: 12,
        macd_slow: 26,
        macd_signal: 9,
        bollinger_period: 20,
        bollinger_width: 2.0,
        atr_period: 14,
    },

    confirmation: ConfirmationSettings {
        confidence_threshold: 70.0,
        history_limit: 100,
        timeframe: Timeframe::H1,
        alignment_timeframes: [Timeframe::H1, Timeframe::H4, Timeframe::D1],
    },
};

impl Default for AnalysisConfig {
    fn default() -> Self {
        ANALYSIS
    }
}
