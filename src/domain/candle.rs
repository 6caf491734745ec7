use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

// Define the Candle struct with all its properties
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp_ms: i64,

    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,

    pub volume: f64,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience
    pub fn new(
        timestamp_ms: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Candle {
            timestamp_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close_price >= self.open_price {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    /// True range against the previous close. With no previous candle the
    /// range collapses to high - low.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let high_low = self.high_price - self.low_price;
        match prev_close {
            Some(prev) => {
                let high_close = (self.high_price - prev).abs();
                let low_close = (self.low_price - prev).abs();
                high_low.max(high_close).max(low_close)
            }
            None => high_low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_type() {
        let bull = Candle::new(0, 1.0, 1.2, 0.9, 1.1, 10.0);
        let bear = Candle::new(0, 1.1, 1.2, 0.9, 1.0, 10.0);
        assert_eq!(bull.get_type(), CandleType::Bullish);
        assert_eq!(bear.get_type(), CandleType::Bearish);
    }

    #[test]
    fn test_true_range_uses_gap_to_previous_close() {
        // Gap up: previous close far below the candle's low
        let candle = Candle::new(0, 1.10, 1.12, 1.09, 1.11, 10.0);
        assert!((candle.true_range(None) - 0.03).abs() < 1e-12);
        assert!((candle.true_range(Some(1.00)) - 0.12).abs() < 1e-12);
    }
}
