use serde::{Deserialize, Serialize};

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum PatternType {
    Continuation,
    Reversal,
    Bilateral,
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum DetectionStatus {
    Active,
    Confirmed,
    Invalidated,
    Completed,
}

/// A chart-pattern detection supplied by the external classifier. This core
/// never creates these; it only reads them and asks the storage collaborator
/// to mutate `status` after confirmation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PatternDetection {
    pub detection_id: i64,
    pub pair_symbol: String,
    pub pattern_name: String,
    pub pattern_type: PatternType,
    pub base_confidence: f64,
    pub price_at_detection: Option<f64>,
    pub target_price: Option<f64>,
    pub status: DetectionStatus,
}

/// Outcome of running a detection through the confirmation rules.
/// Ephemeral; reasons are kept in evaluation order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConfirmationResult {
    pub confirmed: bool,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

impl ConfirmationResult {
    /// The zero-confidence result used when a pair has no usable history.
    pub fn insufficient_data() -> Self {
        Self {
            confirmed: false,
            confidence: 0.0,
            reasons: vec!["Insufficient historical data".to_string()],
        }
    }
}
