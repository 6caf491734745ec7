use serde::{Deserialize, Serialize};

use crate::utils::TimeUtils;

/// Candle timeframe. String forms match the shorthand used by data feeds
/// ("1h", "4h", "1d", ...).
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum Timeframe {
    #[strum(serialize = "15m")]
    M15,
    #[strum(serialize = "30m")]
    M30,
    #[strum(serialize = "1h")]
    H1,
    #[strum(serialize = "4h")]
    H4,
    #[strum(serialize = "1d")]
    D1,
    #[strum(serialize = "1w")]
    W1,
}

impl Timeframe {
    pub fn interval_ms(&self) -> i64 {
        match self {
            Timeframe::M15 => TimeUtils::MS_IN_15_MIN,
            Timeframe::M30 => TimeUtils::MS_IN_30_MIN,
            Timeframe::H1 => TimeUtils::MS_IN_H,
            Timeframe::H4 => TimeUtils::MS_IN_4_H,
            Timeframe::D1 => TimeUtils::MS_IN_D,
            Timeframe::W1 => TimeUtils::MS_IN_W,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct PairInterval {
    pub name: String,
    pub timeframe: Timeframe,
}

impl PairInterval {
    pub fn new(name: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            name: name.into(),
            timeframe,
        }
    }

    // Finds the trading quote at the end of the pair name and returns it.
    // Returns None if no matching quote is found.
    pub fn get_quote(text: &str) -> Option<&str> {
        static PAIR_QUOTES: &[&str] = &["USD", "EUR", "GBP", "JPY", "CHF", "AUD", "CAD", "NZD"];
        PAIR_QUOTES
            .iter()
            .find(|&&ext| text.ends_with(ext))
            .copied()
    }

    pub fn get_base(text: &str) -> Option<&str> {
        let quote = Self::get_quote(text)?;
        text.strip_suffix(quote)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for PairInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} @ {}", self.name, self.timeframe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_timeframe_round_trip() {
        assert_eq!(Timeframe::H1.to_string(), "1h");
        assert_eq!(Timeframe::from_str("4h").unwrap(), Timeframe::H4);
        assert_eq!(Timeframe::D1.interval_ms(), 86_400_000);
    }

    #[test]
    fn test_base_and_quote_split() {
        assert_eq!(PairInterval::get_base("EURUSD"), Some("EUR"));
        assert_eq!(PairInterval::get_quote("GBPJPY"), Some("JPY"));
        assert_eq!(PairInterval::get_quote("XXXXXX"), None);
    }
}
