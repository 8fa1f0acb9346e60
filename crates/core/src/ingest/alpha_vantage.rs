use crate::config::Settings;
use crate::ingest::error::FetchError;
use crate::ingest::provider::MarketDataProvider;
use anyhow::Context;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const QUERY_PATH: &str = "/query";

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_alphavantage_api_key()?.to_string();
        let base_url = settings
            .alphavantage_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("ALPHAVANTAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build alphavantage http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), QUERY_PATH)
    }

    fn query_params<'a>(&'a self, symbol: &'a str) -> [(&'static str, &'a str); 4] {
        [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
            ("outputsize", "compact"),
        ]
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for AlphaVantageClient {
    fn provider_name(&self) -> &'static str {
        "alphavantage"
    }

    // One outbound call, no retries; the scheduler owns retry policy.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Value, FetchError> {
        let res = self
            .http
            .get(self.url())
            .query(&self.query_params(symbol))
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = res.status();
        let text = res.text().await.map_err(FetchError::Network)?;

        if !status.is_success() {
            return Err(FetchError::Http { status, body: text });
        }

        serde_json::from_str::<Value>(&text).map_err(FetchError::Json)
    }
}
