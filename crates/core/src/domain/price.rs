use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV row for a symbol. (symbol, date) is unique within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Ordered daily records for one symbol, in provider response order.
/// Built fresh per run and consumed whole by the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBatch {
    pub symbol: String,
    pub records: Vec<PriceRecord>,
}
