use crate::domain::price::{PriceBatch, PriceRecord};
use crate::ingest::error::MalformedResponseError;
use crate::ingest::types::{DailySeriesDocument, RawDailyBar};
use chrono::NaiveDate;
use serde_json::Value;

/// The provider's compact window is ~100 entries; the warehouse keeps 90.
pub const DAILY_WINDOW: usize = 90;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a raw daily time-series document into a batch of typed records.
///
/// Every entry in the payload is parsed before the batch is truncated to the
/// first [`DAILY_WINDOW`] entries in provider response order (the provider
/// sends newest-first; no re-sort by date happens here). All-or-nothing: one
/// bad entry anywhere fails the whole batch.
pub fn normalize_daily_series(raw: &Value) -> Result<PriceBatch, MalformedResponseError> {
    let doc: DailySeriesDocument = serde_json::from_value(raw.clone())
        .map_err(|err| MalformedResponseError::new(err.to_string()))?;

    let symbol = doc.meta.symbol.trim();
    if symbol.is_empty() {
        return Err(MalformedResponseError::new("metadata symbol is empty"));
    }

    let mut records = Vec::with_capacity(doc.series.len());
    for (date_str, bar) in &doc.series {
        records.push(parse_bar(symbol, date_str, bar)?);
    }
    records.truncate(DAILY_WINDOW);

    Ok(PriceBatch {
        symbol: symbol.to_string(),
        records,
    })
}

fn parse_bar(
    symbol: &str,
    date_str: &str,
    bar: &RawDailyBar,
) -> Result<PriceRecord, MalformedResponseError> {
    let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| {
        MalformedResponseError::new(format!("time-series key {date_str:?} is not a date"))
    })?;

    Ok(PriceRecord {
        symbol: symbol.to_string(),
        date,
        open: parse_price(date_str, "1. open", &bar.open)?,
        high: parse_price(date_str, "2. high", &bar.high)?,
        low: parse_price(date_str, "3. low", &bar.low)?,
        close: parse_price(date_str, "4. close", &bar.close)?,
        volume: parse_volume(date_str, &bar.volume)?,
    })
}

fn parse_price(date: &str, field: &str, s: &str) -> Result<f64, MalformedResponseError> {
    let v = s.trim().parse::<f64>().map_err(|_| {
        MalformedResponseError::new(format!("{field} at {date} is not numeric: {s:?}"))
    })?;
    if !v.is_finite() || v < 0.0 {
        return Err(MalformedResponseError::new(format!(
            "{field} at {date} must be a non-negative finite number, got {s:?}"
        )));
    }
    Ok(v)
}

fn parse_volume(date: &str, s: &str) -> Result<i64, MalformedResponseError> {
    let v = s.trim().parse::<i64>().map_err(|_| {
        MalformedResponseError::new(format!("5. volume at {date} is not an integer: {s:?}"))
    })?;
    if v < 0 {
        return Err(MalformedResponseError::new(format!(
            "5. volume at {date} must be non-negative, got {s:?}"
        )));
    }
    Ok(v)
}
