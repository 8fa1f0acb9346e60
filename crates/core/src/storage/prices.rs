use crate::domain::price::PriceRecord;
use crate::storage::error::LoadError;

const MAX_SYMBOL_LEN: usize = 10;

/// Derive the quoted `"schema"."SYMBOL"` identifier for a symbol's table.
///
/// Table names cannot be bind parameters, so the symbol is validated before
/// it is ever spliced into SQL: ASCII alphanumerics plus `.` and `-` only
/// (covers tickers like BRK.B), at most [`MAX_SYMBOL_LEN`] chars, upper-cased
/// to one canonical table per symbol.
pub fn warehouse_table(schema: &str, symbol: &str) -> Result<String, LoadError> {
    let symbol = symbol.trim();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let schema_valid = !schema.is_empty()
        && schema.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid || !schema_valid {
        return Err(LoadError::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }

    Ok(format!("\"{}\".\"{}\"", schema, symbol.to_ascii_uppercase()))
}

/// Full-refresh load: atomically replace the symbol's table contents with
/// `records`. Returns the number of rows inserted.
///
/// The table is named from the `symbol` argument, never from row content; a
/// batch holding rows for another symbol is a caller-contract violation and
/// is not checked here.
pub async fn replace_daily_prices(
    pool: &sqlx::PgPool,
    schema: &str,
    symbol: &str,
    records: &[PriceRecord],
) -> Result<u64, LoadError> {
    let table = warehouse_table(schema, symbol)?;

    let mut tx = pool.begin().await.map_err(|source| LoadError::Sql {
        stage: "begin",
        table: table.clone(),
        source,
    })?;

    match replace_in_tx(&mut tx, schema, &table, records).await {
        Ok(inserted) => {
            tx.commit().await.map_err(|source| LoadError::Sql {
                stage: "commit",
                table: table.clone(),
                source,
            })?;
            Ok(inserted)
        }
        Err(err) => {
            // Restore the pre-run table state, then surface the failure.
            if let Err(rb) = tx.rollback().await {
                tracing::warn!(%table, error = %rb, "rollback after failed load also failed");
            }
            Err(err)
        }
    }
}

async fn replace_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    schema: &str,
    table: &str,
    records: &[PriceRecord],
) -> Result<u64, LoadError> {
    let sql_err = |stage: &'static str| {
        let table = table.to_string();
        move |source| LoadError::Sql { stage, table, source }
    };

    // Additive DDL only; an existing table is never altered.
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
        .persistent(false)
        .execute(&mut **tx)
        .await
        .map_err(sql_err("create schema"))?;

    let create_sql = format!(
        "CREATE TABLE IF NOT EXISTS {table} ( \
           symbol VARCHAR(10) NOT NULL, \
           date DATE NOT NULL, \
           open DOUBLE PRECISION NOT NULL, \
           close DOUBLE PRECISION NOT NULL, \
           high DOUBLE PRECISION NOT NULL, \
           low DOUBLE PRECISION NOT NULL, \
           volume BIGINT NOT NULL, \
           PRIMARY KEY (symbol, date) \
         )"
    );
    sqlx::query(&create_sql)
        .persistent(false)
        .execute(&mut **tx)
        .await
        .map_err(sql_err("create table"))?;

    sqlx::query(&format!("DELETE FROM {table}"))
        .persistent(false)
        .execute(&mut **tx)
        .await
        .map_err(sql_err("delete"))?;

    let insert_sql = format!(
        "INSERT INTO {table} (symbol, date, open, close, high, low, volume) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)"
    );
    let mut inserted: u64 = 0;
    for record in records {
        let res = sqlx::query(&insert_sql)
            .persistent(false)
            .bind(&record.symbol)
            .bind(record.date)
            .bind(record.open)
            .bind(record.close)
            .bind(record.high)
            .bind(record.low)
            .bind(record.volume)
            .execute(&mut **tx)
            .await
            .map_err(sql_err("insert"))?;
        inserted += res.rows_affected();
    }

    Ok(inserted)
}
