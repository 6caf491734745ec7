//! Writes a deterministic synthetic candle cache so the analyzer can be run
//! without any upstream data source.

use anyhow::Result;
use std::f64::consts::TAU;

use breakout_sniper::data::{CacheFile, TimeSeriesCollection};
use breakout_sniper::domain::candle::Candle;
use breakout_sniper::domain::pair_interval::{PairInterval, Timeframe};
use breakout_sniper::models::pattern::{DetectionStatus, PatternDetection, PatternType};
use breakout_sniper::models::timeseries::OhlcvTimeSeries;

const DEMO_PAIRS: &[(&str, f64)] = &[("EURUSD", 1.10), ("GBPUSD", 1.27), ("USDJPY", 148.0)];
const DEMO_TIMEFRAMES: &[Timeframe] = &[Timeframe::H1, Timeframe::H4, Timeframe::D1];
const DEMO_CANDLES: usize = 400;

fn main() -> Result<()> {
    let mut store = TimeSeriesCollection::new();

    for &(pair, base_price) in DEMO_PAIRS {
        for &timeframe in DEMO_TIMEFRAMES {
            store.add_series(synthetic_series(pair, timeframe, base_price))?;
        }
    }

    store.add_detection(PatternDetection {
        detection_id: 1,
        pair_symbol: "EURUSD".to_string(),
        pattern_name: "ascending triangle".to_string(),
        pattern_type: PatternType::Continuation,
        base_confidence: 65.0,
        price_at_detection: Some(1.10),
        target_price: Some(1.12),
        status: DetectionStatus::Active,
    });
    store.add_detection(PatternDetection {
        detection_id: 2,
        pair_symbol: "GBPUSD".to_string(),
        pattern_name: "double top".to_string(),
        pattern_type: PatternType::Reversal,
        base_confidence: 60.0,
        price_at_detection: None,
        target_price: None,
        status: DetectionStatus::Active,
    });

    let cache = CacheFile::new(store);
    let path = CacheFile::default_cache_path();
    cache.save_to_path(&path)?;

    println!(
        "✅ Demo cache written to {:?} with {} series.",
        path,
        cache.data.series_data.len()
    );
    Ok(())
}

/// A drifting sine wave with a couple of harmonics: enough structure to
/// produce swing points, clustered extremes and the occasional breakout.
fn synthetic_series(pair: &str, timeframe: Timeframe, base_price: f64) -> OhlcvTimeSeries {
    let interval_ms = timeframe.interval_ms();
    let mut candles = Vec::with_capacity(DEMO_CANDLES);
    let mut prev_close = base_price;

    for i in 0..DEMO_CANDLES {
        let t = i as f64 / DEMO_CANDLES as f64;
        let wave = (t * 10.0 * TAU).sin() * 0.004 + (t * 3.0 * TAU).sin() * 0.008;
        let drift = t * 0.01;
        let close = base_price * (1.0 + wave + drift);

        let open = prev_close;
        let high = open.max(close) * 1.0008;
        let low = open.min(close) * 0.9992;
        let volume = 100.0 + 50.0 * (t * 7.0 * TAU).sin().abs();

        candles.push(Candle::new(
            i as i64 * interval_ms,
            open,
            high,
            low,
            close,
            volume,
        ));
        prev_close = close;
    }

    OhlcvTimeSeries::from_candles(PairInterval::new(pair, timeframe), &candles)
}
