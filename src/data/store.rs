use std::collections::HashMap;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::MarketData;
use crate::domain::pair_interval::{PairInterval, Timeframe};
use crate::models::breakout::Breakout;
use crate::models::pattern::{DetectionStatus, PatternDetection};
use crate::models::timeseries::OhlcvTimeSeries;

/// A breakout as recorded by the store, with its assigned identity and
/// lifecycle status.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoredBreakout {
    pub breakout_id: i64,
    pub pair_symbol: String,
    pub breakout: Breakout,
    pub status: DetectionStatus,
}

/// In-memory implementation of [`MarketData`]: a bag of per-pair series plus
/// pattern detections and persisted breakouts. The binaries load one from a
/// cache file; tests build one by hand.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TimeSeriesCollection {
    pub series_data: Vec<OhlcvTimeSeries>,
    pub detections: Vec<PatternDetection>,
    pub breakouts: Vec<StoredBreakout>,

    detection_notes: HashMap<i64, String>,
    next_breakout_id: i64,
}

impl TimeSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series after checking its invariants (equal columns, strictly
    /// increasing timestamps).
    pub fn add_series(&mut self, series: OhlcvTimeSeries) -> Result<()> {
        series.validate()?;
        self.series_data.push(series);
        Ok(())
    }

    pub fn add_detection(&mut self, detection: PatternDetection) {
        self.detections.push(detection);
    }

    pub fn pair_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .series_data
            .iter()
            .map(|s| s.pair_interval.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn detection_notes(&self, detection_id: i64) -> Option<&str> {
        self.detection_notes.get(&detection_id).map(|s| s.as_str())
    }

    fn has_pair(&self, pair_symbol: &str) -> bool {
        self.series_data
            .iter()
            .any(|s| s.pair_interval.name == pair_symbol)
    }
}

impl MarketData for TimeSeriesCollection {
    fn get_series(
        &self,
        pair_symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<OhlcvTimeSeries> {
        if !self.has_pair(pair_symbol) {
            bail!("Currency pair {} not found", pair_symbol);
        }

        // Pair known but no candles at this timeframe: an empty series, not
        // an error.
        let found = self.series_data.iter().find(|s| {
            s.pair_interval.name == pair_symbol && s.pair_interval.timeframe == timeframe
        });

        match found {
            Some(series) => {
                let mut series = series.clone();
                series.truncate_to_recent(limit);
                Ok(series)
            }
            None => Ok(OhlcvTimeSeries::new(PairInterval::new(
                pair_symbol,
                timeframe,
            ))),
        }
    }

    fn get_active_detections(&self) -> Result<Vec<PatternDetection>> {
        Ok(self
            .detections
            .iter()
            .filter(|d| d.status == DetectionStatus::Active)
            .cloned()
            .collect())
    }

    fn persist_breakout(&mut self, breakout: &Breakout, pair_symbol: &str) -> Result<i64> {
        if !self.has_pair(pair_symbol) {
            bail!("Currency pair {} not found", pair_symbol);
        }

        self.next_breakout_id += 1;
        let breakout_id = self.next_breakout_id;

        self.breakouts.push(StoredBreakout {
            breakout_id,
            pair_symbol: pair_symbol.to_string(),
            breakout: breakout.clone(),
            status: DetectionStatus::Active,
        });

        log::info!(
            "Persisted {} {} breakout for {} at {:.5} (id {})",
            breakout.direction,
            breakout.source,
            pair_symbol,
            breakout.price,
            breakout_id
        );

        Ok(breakout_id)
    }

    fn update_detection_status(
        &mut self,
        detection_id: i64,
        status: DetectionStatus,
        notes: Option<&str>,
    ) -> Result<()> {
        let detection = self
            .detections
            .iter_mut()
            .find(|d| d.detection_id == detection_id);

        match detection {
            Some(detection) => {
                detection.status = status;
                if let Some(notes) = notes {
                    self.detection_notes
                        .insert(detection_id, notes.to_string());
                }
                Ok(())
            }
            None => bail!("Pattern detection {} not found", detection_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::models::breakout::{BreakoutDirection, BreakoutSource};
    use crate::models::pattern::PatternType;

    fn flat_series(pair: &str, timeframe: Timeframe, len: usize) -> OhlcvTimeSeries {
        let candles: Vec<Candle> = (0..len)
            .map(|i| {
                Candle::new(
                    i as i64 * timeframe.interval_ms(),
                    1.0,
                    1.0,
                    1.0,
                    1.0,
                    100.0,
                )
            })
            .collect();
        OhlcvTimeSeries::from_candles(PairInterval::new(pair, timeframe), &candles)
    }

    fn detection(id: i64, status: DetectionStatus) -> PatternDetection {
        PatternDetection {
            detection_id: id,
            pair_symbol: "EURUSD".to_string(),
            pattern_name: "flag".to_string(),
            pattern_type: PatternType::Continuation,
            base_confidence: 60.0,
            price_at_detection: None,
            target_price: None,
            status,
        }
    }

    #[test]
    fn test_unknown_pair_is_an_error() {
        let store = TimeSeriesCollection::new();
        assert!(store.get_series("EURUSD", Timeframe::H1, 10).is_err());
    }

    #[test]
    fn test_known_pair_missing_timeframe_is_empty() {
        let mut store = TimeSeriesCollection::new();
        store
            .add_series(flat_series("EURUSD", Timeframe::H1, 5))
            .unwrap();

        let series = store.get_series("EURUSD", Timeframe::D1, 10).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_get_series_respects_limit() {
        let mut store = TimeSeriesCollection::new();
        store
            .add_series(flat_series("EURUSD", Timeframe::H1, 50))
            .unwrap();

        let series = store.get_series("EURUSD", Timeframe::H1, 20).unwrap();
        assert_eq!(series.len(), 20);
    }

    #[test]
    fn test_active_detection_filter_and_status_update() {
        let mut store = TimeSeriesCollection::new();
        store.add_detection(detection(1, DetectionStatus::Active));
        store.add_detection(detection(2, DetectionStatus::Completed));

        let active = store.get_active_detections().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].detection_id, 1);

        store
            .update_detection_status(1, DetectionStatus::Confirmed, Some("confirmed by filter"))
            .unwrap();
        assert_eq!(store.detections[0].status, DetectionStatus::Confirmed);
        assert_eq!(store.detection_notes(1), Some("confirmed by filter"));

        assert!(
            store
                .update_detection_status(99, DetectionStatus::Invalidated, None)
                .is_err()
        );
    }

    #[test]
    fn test_persist_breakout_assigns_ids() {
        let mut store = TimeSeriesCollection::new();
        store
            .add_series(flat_series("EURUSD", Timeframe::H1, 5))
            .unwrap();

        let breakout = Breakout {
            timestamp_ms: 0,
            direction: BreakoutDirection::Bullish,
            source: BreakoutSource::Horizontal,
            reference_value: 1.0,
            price: 1.01,
            percentage_move: 0.01,
            strength: 5.0,
            touch_count: Some(3),
            confirmed: true,
        };

        let first = store.persist_breakout(&breakout, "EURUSD").unwrap();
        let second = store.persist_breakout(&breakout, "EURUSD").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.breakouts.len(), 2);
        assert_eq!(store.breakouts[0].status, DetectionStatus::Active);

        assert!(store.persist_breakout(&breakout, "GBPUSD").is_err());
    }
}
