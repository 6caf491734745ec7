use serde::{Deserialize, Serialize};

/// Whether a line or level acts as support (below price) or resistance
/// (above price).
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
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingKind {
    High,
    Low,
}

/// A local price extremum over a symmetric neighbourhood window.
/// Derived per analysis call, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SwingPoint {
    pub timestamp_ms: i64,
    /// Seconds since the first candle of the series the point came from.
    pub elapsed_secs: f64,
    pub price: f64,
    pub kind: SwingKind,
}

/// A fitted linear relationship between elapsed time and price, acting as
/// dynamic support or resistance.
///
/// `strength = point_count * timespan_seconds / 3600`, so it rewards both
/// how many swing points back the line and how long they span.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrendLine {
    pub kind: LevelKind,
    pub slope: f64,
    pub intercept: f64,
    /// Supporting points as (price, elapsed_secs), in the order they were
    /// merged into the line.
    pub points: Vec<(f64, f64)>,
    pub strength: f64,
    /// Line value at every candle timestamp of the source series.
    pub values: Vec<f64>,
    /// Line value at the latest candle timestamp.
    pub current_value: f64,
}

impl TrendLine {
    pub fn value_at(&self, elapsed_secs: f64) -> f64 {
        self.slope * elapsed_secs + self.intercept
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

/// Support and resistance trend lines for one analysis pass.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TrendLineSet {
    pub support: Vec<TrendLine>,
    pub resistance: Vec<TrendLine>,
}

impl TrendLineSet {
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }
}

/// A horizontal price level where price has historically reversed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HorizontalLevel {
    pub kind: LevelKind,
    pub price: f64,
    /// Accumulated cluster count from the sliding-window detector.
    pub strength: f64,
    /// Number of bounce-style touches against the level.
    pub touch_count: usize,
}

/// Support and resistance levels for one analysis pass.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LevelSet {
    pub support: Vec<HorizontalLevel>,
    pub resistance: Vec<HorizontalLevel>,
}

impl LevelSet {
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }
}
