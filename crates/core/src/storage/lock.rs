use anyhow::Context;

// Advisory locks are scoped to the Postgres session. This guards the
// single-active-run-per-symbol contract: the full-refresh delete+insert is
// not safe against a concurrent writer on the same table.
const LOCK_NAMESPACE: i64 = 0x50_5249_4345; // "PRICE" as hex-ish namespace.

fn lock_key_for_symbol(symbol: &str) -> i64 {
    let hash = symbol
        .trim()
        .to_ascii_uppercase()
        .bytes()
        .fold(0i64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as i64));
    LOCK_NAMESPACE ^ hash
}

pub async fn try_acquire_symbol_lock(pool: &sqlx::PgPool, symbol: &str) -> anyhow::Result<bool> {
    let key = lock_key_for_symbol(symbol);
    let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .persistent(false)
        .bind(key)
        .fetch_one(pool)
        .await
        .with_context(|| format!("failed to acquire advisory lock (key={key})"))?;
    Ok(acquired.0)
}

pub async fn release_symbol_lock(pool: &sqlx::PgPool, symbol: &str) -> anyhow::Result<()> {
    let key = lock_key_for_symbol(symbol);
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .persistent(false)
        .bind(key)
        .execute(pool)
        .await
        .with_context(|| format!("failed to release advisory lock (key={key})"))?;
    Ok(())
}
