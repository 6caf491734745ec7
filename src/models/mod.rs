// Domain models for breakout analysis
// These modules contain pure data types independent of the algorithms

pub mod breakout;
pub mod geometry;
pub mod indicators;
pub mod pattern;
pub mod timeseries;

// Re-export key types for convenience
pub use breakout::{Breakout, BreakoutDirection, BreakoutSource};
pub use geometry::{
    HorizontalLevel, LevelKind, LevelSet, SwingKind, SwingPoint, TrendLine, TrendLineSet,
};
pub use indicators::{IndicatorSeries, IndicatorSnapshot};
pub use pattern::{ConfirmationResult, DetectionStatus, PatternDetection, PatternType};
pub use timeseries::{OhlcvTimeSeries, find_matching_series};
