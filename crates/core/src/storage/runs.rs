use anyhow::Context;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Append one audit row for a finished (or failed) pipeline run.
pub async fn record_pipeline_run(
    pool: &sqlx::PgPool,
    symbol: &str,
    provider: &str,
    status: &str,
    rows_loaded: Option<i64>,
    error: Option<&str>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let run_at: DateTime<Utc> = Utc::now();

    sqlx::query(
        "INSERT INTO price_ingest_runs (id, symbol, run_at, provider, status, rows_loaded, error) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .persistent(false)
    .bind(id)
    .bind(symbol)
    .bind(run_at)
    .bind(provider)
    .bind(status)
    .bind(rows_loaded)
    .bind(error)
    .execute(pool)
    .await
    .context("insert price_ingest_runs failed")?;

    Ok(id)
}
