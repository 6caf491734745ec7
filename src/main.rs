use anyhow::{Context, Result};
use clap::Parser;

use breakout_sniper::analysis::{BreakoutAnalyzer, SignalConfirmer};
use breakout_sniper::data::CacheFile;
use breakout_sniper::utils::time_utils::epoch_ms_to_utc;
use breakout_sniper::{Cli, PairAnalysis};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    log::info!("Parsed arguments: {:?}", args);

    // C. Load cached candles
    let cache_path = args
        .cache
        .clone()
        .unwrap_or_else(CacheFile::default_cache_path);
    let cache = CacheFile::load_from_path(&cache_path)
        .with_context(|| format!("No candle cache at {:?} (run make_demo_cache)", cache_path))?;
    let mut store = cache.data;

    let pairs: Vec<String> = match &args.pair {
        Some(pair) => vec![pair.clone()],
        None => store.pair_names().iter().map(|p| p.to_string()).collect(),
    };

    // D. Breakout analysis per pair
    {
        let analyzer = BreakoutAnalyzer::new(&mut store);
        for pair in &pairs {
            let analysis = analyzer.analyze(pair, args.timeframe)?;
            match &analysis {
                PairAnalysis::Report(report) => {
                    log::info!(
                        "{} latest candle {} at {:.5}",
                        report.pair_symbol,
                        epoch_ms_to_utc(report.latest_timestamp_ms),
                        report.latest_price
                    );
                    println!("{}", serde_json::to_string_pretty(report)?);
                }
                PairAnalysis::InsufficientData { pair_symbol, .. } => {
                    log::warn!("Skipping {}: insufficient data", pair_symbol);
                }
            }
        }
    }

    // E. Signal filter over active pattern detections
    if args.filter_signals {
        let confirmer = SignalConfirmer::new(&mut store);
        let threshold = breakout_sniper::config::ANALYSIS
            .confirmation
            .confidence_threshold;
        let confirmed = confirmer.filter_signals(threshold)?;

        for (detection, result) in &confirmed {
            println!(
                "{} {} confirmed at {:.0}: {}",
                detection.pair_symbol,
                detection.pattern_name,
                result.confidence,
                result.reasons.join("; ")
            );

            // Alignment context for the confirmed pair
            let alignment = confirmer.multi_timeframe_confirmation(&detection.pair_symbol)?;
            println!("{}", serde_json::to_string_pretty(&alignment)?);
        }
    }

    Ok(())
}
