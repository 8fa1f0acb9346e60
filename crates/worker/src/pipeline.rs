use anyhow::Context;
use pricefeed_core::domain::price::PriceBatch;
use pricefeed_core::ingest::normalize::normalize_daily_series;
use pricefeed_core::ingest::provider::MarketDataProvider;
use pricefeed_core::storage::prices::replace_daily_prices;

/// Fetch the raw series for `symbol` and normalize it. No warehouse access;
/// this is the whole pipeline in dry-run mode.
pub async fn fetch_and_normalize(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> anyhow::Result<PriceBatch> {
    let raw = provider
        .fetch_daily_series(symbol)
        .await
        .with_context(|| format!("fetch daily series for {symbol} failed"))?;
    tracing::info!(%symbol, provider = provider.provider_name(), "fetched daily series");

    let batch = normalize_daily_series(&raw)
        .with_context(|| format!("normalize daily series for {symbol} failed"))?;

    // The table is named from the requested symbol, not from the payload.
    if !batch.symbol.eq_ignore_ascii_case(symbol) {
        tracing::warn!(
            requested = %symbol,
            payload = %batch.symbol,
            "provider metadata symbol differs from requested symbol"
        );
    }

    tracing::info!(%symbol, records = batch.records.len(), "normalized daily series");
    Ok(batch)
}

/// One full run for one symbol: fetch, normalize, full-refresh load.
/// Returns the number of rows now in the symbol's table.
pub async fn refresh_symbol(
    provider: &dyn MarketDataProvider,
    pool: &sqlx::PgPool,
    schema: &str,
    symbol: &str,
) -> anyhow::Result<u64> {
    let batch = fetch_and_normalize(provider, symbol).await?;

    let rows = replace_daily_prices(pool, schema, symbol, &batch.records)
        .await
        .with_context(|| format!("full refresh load for {symbol} failed"))?;

    tracing::info!(%symbol, rows, "replaced warehouse table contents");
    Ok(rows)
}
