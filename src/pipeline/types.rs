//! Wire payloads exchanged with the gateway

use crate::stats::Aggregate;
use serde::{Deserialize, Serialize};

/// A reported transaction: amount at an epoch-millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub timestamp: i64,
}

impl Transaction {
    pub fn new(amount: f64, timestamp: i64) -> Self {
        Self { amount, timestamp }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Statistics over the trailing window, as returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub sum: f64,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    pub count: u64,
}

impl SummaryStats {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Aggregate> for SummaryStats {
    fn from(agg: Aggregate) -> Self {
        Self {
            sum: agg.sum,
            avg: agg.average(),
            max: agg.max,
            min: agg.min,
            count: agg.count,
        }
    }
}
