pub mod domain;
pub mod ingest;
pub mod storage;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_WAREHOUSE_SCHEMA: &str = "raw";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub alphavantage_api_key: Option<String>,
        pub alphavantage_base_url: Option<String>,
        pub warehouse_schema: Option<String>,
        pub default_symbol: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                alphavantage_api_key: std::env::var("ALPHAVANTAGE_API_KEY").ok(),
                alphavantage_base_url: std::env::var("ALPHAVANTAGE_BASE_URL").ok(),
                warehouse_schema: std::env::var("WAREHOUSE_SCHEMA").ok(),
                default_symbol: std::env::var("PIPELINE_SYMBOL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub fn require_alphavantage_api_key(&self) -> anyhow::Result<&str> {
            self.alphavantage_api_key
                .as_deref()
                .context("ALPHAVANTAGE_API_KEY is required")
        }

        pub fn warehouse_schema(&self) -> &str {
            self.warehouse_schema
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_WAREHOUSE_SCHEMA)
        }
    }
}
