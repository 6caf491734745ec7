use serde::{Deserialize, Serialize};

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
pub enum BreakoutDirection {
    Bullish,
    Bearish,
}

/// What the breakout crossed: a fitted trend line or a horizontal level.
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
#[strum(serialize_all = "snake_case")]
pub enum BreakoutSource {
    TrendLine,
    Horizontal,
}

/// A confirmed close beyond a reference by at least the minimum percentage,
/// sustained for the configured number of confirmation candles.
///
/// Identity is assigned by the storage collaborator on persistence; until
/// then a breakout is a plain value.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Breakout {
    pub timestamp_ms: i64,
    pub direction: BreakoutDirection,
    pub source: BreakoutSource,
    /// The crossed reference: line value at the breakout candle, or the
    /// constant level price.
    pub reference_value: f64,
    /// Close of the breakout candle.
    pub price: f64,
    /// (price - reference) / reference, sign-adjusted so bullish and
    /// bearish moves are both positive.
    pub percentage_move: f64,
    /// Strength of the line or level that was broken.
    pub strength: f64,
    /// Touch count of the broken level; None for trend-line breakouts.
    pub touch_count: Option<usize>,
    /// Confirmation is a precondition for emission, so this is always true
    /// on breakouts produced by the detector. Kept explicit because the
    /// storage collaborator persists it.
    pub confirmed: bool,
}
