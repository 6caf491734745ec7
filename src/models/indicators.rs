use serde::{Deserialize, Serialize};

/// Per-candle indicator values. `None` means the rolling window has not
/// filled yet (the first 19 candles have no sma20, and so on). Checks
/// against an undefined value are simply false, matching how the rules in
/// the confirmation engine are written.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub volume: f64,

    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,

    pub rsi: Option<f64>,

    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,

    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,

    pub atr: Option<f64>,
}

/// Indicator snapshots for a whole series, one per candle, recomputed fresh
/// on every call. No incremental state survives between calls.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct IndicatorSeries {
    pub snapshots: Vec<IndicatorSnapshot>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorSnapshot> {
        self.snapshots.last()
    }

    /// Mean ATR over all candles where ATR is defined.
    pub fn mean_atr(&self) -> Option<f64> {
        let defined: Vec<f64> = self.snapshots.iter().filter_map(|s| s.atr).collect();
        if defined.is_empty() {
            return None;
        }
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}
