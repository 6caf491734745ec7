//! Configuration module for the breakout analysis engine.

pub mod analysis;
pub mod persistence;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig};
pub use persistence::{PERSISTENCE, candle_cache_filename};
