use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health prediction for one device at one monitoring cycle.
///
/// `health_score` and `confidence` are both in `[0, 1]`. A score of 1.0
/// with zero confidence means "insufficiently observed", not "healthy".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub device: String,
    pub timestamp: DateTime<Utc>,
    pub health_score: f64,
    pub confidence: f64,
}
