/// Settings for the on-disk candle cache used by the binaries
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub cache_directory: &'static str,
    pub cache_version: f64,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    cache_directory: "cache",
    cache_version: 1.0,
};

pub fn candle_cache_filename() -> String {
    format!("candles_v{}.bin", PERSISTENCE.cache_version)
}
