use indexmap::IndexMap;
use serde::Deserialize;

/// Typed view of the Alpha Vantage TIME_SERIES_DAILY document. The time
/// series is an IndexMap because truncation downstream keeps the first 90
/// entries in provider response order; an unordered map would silently
/// select the wrong days.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySeriesDocument {
    #[serde(rename = "Meta Data")]
    pub meta: SeriesMetaData,
    #[serde(rename = "Time Series (Daily)")]
    pub series: IndexMap<String, RawDailyBar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesMetaData {
    #[serde(rename = "2. Symbol")]
    pub symbol: String,
}

/// One day as the provider sends it: every field a numeric string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_provider_shape() {
        let v = json!({
            "Meta Data": {
                "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                "2. Symbol": "LLY",
                "3. Last Refreshed": "2025-01-03"
            },
            "Time Series (Daily)": {
                "2025-01-03": {
                    "1. open": "101.0",
                    "2. high": "105.0",
                    "3. low": "99.5",
                    "4. close": "104.0",
                    "5. volume": "1000000"
                },
                "2025-01-02": {
                    "1. open": "100.0",
                    "2. high": "102.0",
                    "3. low": "98.0",
                    "4. close": "101.0",
                    "5. volume": "900000"
                }
            }
        });

        let doc: DailySeriesDocument = serde_json::from_value(v).unwrap();
        assert_eq!(doc.meta.symbol, "LLY");
        assert_eq!(doc.series.len(), 2);

        // Provider order survives deserialization (newest-first here).
        let dates: Vec<&str> = doc.series.keys().map(String::as_str).collect();
        assert_eq!(dates, ["2025-01-03", "2025-01-02"]);
        assert_eq!(doc.series["2025-01-03"].volume, "1000000");
    }

    #[test]
    fn rejects_missing_per_day_field() {
        let v = json!({
            "Meta Data": { "2. Symbol": "LLY" },
            "Time Series (Daily)": {
                "2025-01-02": {
                    "1. open": "100.0",
                    "2. high": "102.0",
                    "3. low": "98.0",
                    "4. close": "101.0"
                }
            }
        });

        assert!(serde_json::from_value::<DailySeriesDocument>(v).is_err());
    }
}
