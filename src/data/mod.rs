//! Access to historical data and persistence collaborators.
//!
//! The analysis engines never talk to a database or network themselves; they
//! go through the [`MarketData`] trait, injected at construction. The crate
//! ships one implementation, the in-memory [`TimeSeriesCollection`], which
//! the binaries load from a cache file.

pub mod cache_file;
pub mod store;

use anyhow::Result;

use crate::domain::pair_interval::Timeframe;
use crate::models::breakout::Breakout;
use crate::models::pattern::{DetectionStatus, PatternDetection};
use crate::models::timeseries::OhlcvTimeSeries;

pub use cache_file::CacheFile;
pub use store::TimeSeriesCollection;

/// The external collaborator this core consumes data from and produces
/// results for.
///
/// An unknown pair is an error, propagated unmodified. A known pair with no
/// candles at the requested timeframe yields an empty series, which is a
/// valid state, not a failure.
pub trait MarketData {
    /// Historical candles for a pair, time-ascending, at most `limit` of the
    /// most recent.
    fn get_series(
        &self,
        pair_symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<OhlcvTimeSeries>;

    /// All pattern detections currently in `active` status, in the
    /// collaborator's native order.
    fn get_active_detections(&self) -> Result<Vec<PatternDetection>>;

    /// Durably record a detected breakout. The collaborator assigns and
    /// returns its identity.
    fn persist_breakout(&mut self, breakout: &Breakout, pair_symbol: &str) -> Result<i64>;

    /// Persist a status change for a pattern detection.
    fn update_detection_status(
        &mut self,
        detection_id: i64,
        status: DetectionStatus,
        notes: Option<&str>,
    ) -> Result<()>;
}

// Lets one store back several engines without interior mutability: each
// engine owns a `&mut` borrow for the duration of its calls.
impl<T: MarketData + ?Sized> MarketData for &mut T {
    fn get_series(
        &self,
        pair_symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<OhlcvTimeSeries> {
        (**self).get_series(pair_symbol, timeframe, limit)
    }

    fn get_active_detections(&self) -> Result<Vec<PatternDetection>> {
        (**self).get_active_detections()
    }

    fn persist_breakout(&mut self, breakout: &Breakout, pair_symbol: &str) -> Result<i64> {
        (**self).persist_breakout(breakout, pair_symbol)
    }

    fn update_detection_status(
        &mut self,
        detection_id: i64,
        status: DetectionStatus,
        notes: Option<&str>,
    ) -> Result<()> {
        (**self).update_detection_status(detection_id, status, notes)
    }
}
