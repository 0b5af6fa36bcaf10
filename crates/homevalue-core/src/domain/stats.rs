use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate statistics over the valid records of a snapshot or segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub average_price: f64,
    pub median_price: f64,
    /// Number of valid records the statistic was computed from.
    pub total_volume: u64,
    pub price_change_percent: f64,
    /// `None` when no contributing record carries a square footage.
    pub average_square_footage: Option<f64>,
    pub oldest_year: Option<i32>,
    pub newest_year: Option<i32>,
}

impl MarketStats {
    /// Zero-valued statistic for a segment without a single valid record.
    pub fn empty() -> Self {
        Self::default()
    }

    pub const fn is_empty(&self) -> bool {
        self.total_volume == 0
    }
}

/// Average price of the records built in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub year: i32,
    pub label: String,
    #[serde(alias = "avgPrice")]
    pub average_price: f64,
    pub count: u64,
}

impl TrendPoint {
    pub fn new(year: i32, average_price: f64, count: u64) -> Self {
        Self {
            year,
            label: year.to_string(),
            average_price,
            count,
        }
    }
}

/// Statistics keyed by bedroom count, in ascending order.
pub type BedroomSegments = BTreeMap<u32, MarketStats>;
