use crate::ingest::error::FetchError;
use serde_json::Value;

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Fetch the raw daily time-series document for one symbol. No shape
    /// validation happens here; the normalizer owns that.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Value, FetchError>;
}
