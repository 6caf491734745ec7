use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::domain::candle::Candle;
use crate::domain::pair_interval::{PairInterval, Timeframe};

// ============================================================================
// OhlcvTimeSeries: Raw time series data for a trading pair
// ============================================================================

/// Column-oriented OHLCV history for one pair at one timeframe.
///
/// Timestamps are epoch milliseconds, strictly increasing and never
/// duplicated. An empty series is a valid state: operations on it return
/// empty outputs rather than erroring.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OhlcvTimeSeries {
    pub pair_interval: PairInterval,
    pub timestamps_ms: Vec<i64>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    // Volumes
    pub volumes: Vec<f64>,
}

impl OhlcvTimeSeries {
    pub fn new(pair_interval: PairInterval) -> Self {
        Self {
            pair_interval,
            timestamps_ms: Vec::new(),
            open_prices: Vec::new(),
            high_prices: Vec::new(),
            low_prices: Vec::new(),
            close_prices: Vec::new(),
            volumes: Vec::new(),
        }
    }

    pub fn from_candles(pair_interval: PairInterval, candles: &[Candle]) -> Self {
        let mut series = Self::new(pair_interval);
        for candle in candles {
            series.push_candle(candle);
        }
        series
    }

    pub fn push_candle(&mut self, candle: &Candle) {
        self.timestamps_ms.push(candle.timestamp_ms);
        self.open_prices.push(candle.open_price);
        self.high_prices.push(candle.high_price);
        self.low_prices.push(candle.low_price);
        self.close_prices.push(candle.close_price);
        self.volumes.push(candle.volume);
    }

    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.timestamps_ms[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn len(&self) -> usize {
        self.timestamps_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }

    /// Seconds elapsed between the series' first candle and candle `idx`.
    /// This is the x-axis for trend-line regression.
    pub fn elapsed_seconds(&self, idx: usize) -> f64 {
        ((self.timestamps_ms[idx] - self.timestamps_ms[0]) / 1000) as f64
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.close_prices.last().copied()
    }

    pub fn latest_timestamp_ms(&self) -> Option<i64> {
        self.timestamps_ms.last().copied()
    }

    /// Keep only the most recent `limit` candles.
    pub fn truncate_to_recent(&mut self, limit: usize) {
        let len = self.len();
        if len <= limit {
            return;
        }
        let cut = len - limit;
        self.timestamps_ms.drain(..cut);
        self.open_prices.drain(..cut);
        self.high_prices.drain(..cut);
        self.low_prices.drain(..cut);
        self.close_prices.drain(..cut);
        self.volumes.drain(..cut);
    }

    /// Check the series invariants: equal column lengths and strictly
    /// increasing timestamps.
    pub fn validate(&self) -> Result<()> {
        let n = self.timestamps_ms.len();
        if self.open_prices.len() != n
            || self.high_prices.len() != n
            || self.low_prices.len() != n
            || self.close_prices.len() != n
            || self.volumes.len() != n
        {
            bail!(
                "Series {} has ragged columns ({} timestamps)",
                self.pair_interval,
                n
            );
        }
        for pair in self.timestamps_ms.windows(2) {
            if pair[1] <= pair[0] {
                bail!(
                    "Series {} timestamps not strictly increasing at {} -> {}",
                    self.pair_interval,
                    pair[0],
                    pair[1]
                );
            }
        }
        Ok(())
    }
}

pub fn find_matching_series<'a>(
    timeseries_data: &'a [OhlcvTimeSeries],
    pair_name: &str,
    timeframe: Timeframe,
) -> Result<&'a OhlcvTimeSeries> {
    timeseries_data
        .iter()
        .find(|series| {
            series.pair_interval.name == pair_name && series.pair_interval.timeframe == timeframe
        })
        .ok_or_else(|| anyhow!("No series found for pair {} at {}", pair_name, timeframe))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_with_timestamps(timestamps: &[i64]) -> OhlcvTimeSeries {
        let candles: Vec<Candle> = timestamps
            .iter()
            .map(|&ts| Candle::new(ts, 1.0, 1.0, 1.0, 1.0, 1.0))
            .collect();
        OhlcvTimeSeries::from_candles(PairInterval::new("EURUSD", Timeframe::H1), &candles)
    }

    #[test]
    fn test_validate_rejects_duplicate_timestamps() {
        let series = series_with_timestamps(&[0, 3_600_000, 3_600_000]);
        assert!(series.validate().is_err());
    }

    #[test]
    fn test_elapsed_seconds() {
        let series = series_with_timestamps(&[1_000_000, 4_600_000, 8_200_000]);
        assert_eq!(series.elapsed_seconds(0), 0.0);
        assert_eq!(series.elapsed_seconds(2), 7200.0);
    }

    #[test]
    fn test_truncate_to_recent() {
        let mut series = series_with_timestamps(&[0, 1000, 2000, 3000]);
        series.truncate_to_recent(2);
        assert_eq!(series.len(), 2);
        assert_eq!(series.timestamps_ms, vec![2000, 3000]);
    }

    #[test]
    fn test_find_matching_series_unknown_pair() {
        let data = vec![series_with_timestamps(&[0])];
        assert!(find_matching_series(&data, "EURUSD", Timeframe::H1).is_ok());
        assert!(find_matching_series(&data, "GBPUSD", Timeframe::H1).is_err());
    }
}
