#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use analysis::{BreakoutAnalyzer, PairAnalysis, SignalConfirmer};
pub use data::{CacheFile, MarketData, TimeSeriesCollection};
pub use domain::{Candle, PairInterval, Timeframe};
pub use models::{Breakout, OhlcvTimeSeries, PatternDetection};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Candle cache file to analyze (defaults to the configured cache path)
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Analyze a single pair instead of every pair in the cache
    #[arg(long)]
    pub pair: Option<String>,

    /// Timeframe to analyze (1h, 4h, 1d, ...)
    #[arg(long, default_value = "1h")]
    pub timeframe: Timeframe,

    /// Also run the signal filter over active pattern detections
    #[arg(long, default_value_t = false)]
    pub filter_signals: bool,
}
