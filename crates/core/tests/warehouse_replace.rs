//! Full-refresh loader properties against a real warehouse.
//!
//! These tests need a PostgreSQL instance and are ignored by default:
//!
//!     DATABASE_URL=postgres://... cargo test -p pricefeed_core -- --ignored

use chrono::NaiveDate;
use pricefeed_core::domain::price::PriceRecord;
use pricefeed_core::storage::prices::replace_daily_prices;

const SCHEMA: &str = "pricefeed_test";

type Row = (String, NaiveDate, f64, f64, f64, f64, i64);

async fn pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for warehouse tests");
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to warehouse")
}

fn record(symbol: &str, date: NaiveDate, seed: f64) -> PriceRecord {
    PriceRecord {
        symbol: symbol.to_string(),
        date,
        open: 100.0 + seed,
        high: 105.0 + seed,
        low: 99.5 + seed,
        close: 104.0 + seed,
        volume: 1_000_000 + seed as i64,
    }
}

fn batch(symbol: &str, days: usize) -> Vec<PriceRecord> {
    let newest = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    (0..days)
        .map(|i| record(symbol, newest - chrono::Duration::days(i as i64), i as f64))
        .collect()
}

async fn rows(pool: &sqlx::PgPool, symbol: &str) -> Vec<Row> {
    let sql = format!(
        "SELECT symbol, date, open, close, high, low, volume \
         FROM \"{SCHEMA}\".\"{symbol}\" ORDER BY date DESC"
    );
    sqlx::query_as::<_, Row>(&sql)
        .persistent(false)
        .fetch_all(pool)
        .await
        .expect("read back rows")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL and a PostgreSQL warehouse"]
async fn round_trips_one_record() {
    let pool = pool().await;
    let rec = PriceRecord {
        symbol: "LLY".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        open: 100.0,
        high: 105.0,
        low: 99.5,
        close: 104.0,
        volume: 1_000_000,
    };

    let inserted = replace_daily_prices(&pool, SCHEMA, "LLY", std::slice::from_ref(&rec))
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let got = rows(&pool, "LLY").await;
    assert_eq!(got.len(), 1);
    let (symbol, date, open, close, high, low, volume) = got[0].clone();
    assert_eq!(symbol, "LLY");
    assert_eq!(date, rec.date);
    assert_eq!(open, rec.open);
    assert_eq!(close, rec.close);
    assert_eq!(high, rec.high);
    assert_eq!(low, rec.low);
    assert_eq!(volume, rec.volume);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL and a PostgreSQL warehouse"]
async fn loading_twice_equals_loading_once() {
    let pool = pool().await;
    let records = batch("IDEM", 7);

    replace_daily_prices(&pool, SCHEMA, "IDEM", &records).await.unwrap();
    let first = rows(&pool, "IDEM").await;

    replace_daily_prices(&pool, SCHEMA, "IDEM", &records).await.unwrap();
    let second = rows(&pool, "IDEM").await;

    assert_eq!(first, second);
    assert_eq!(second.len(), 7);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL and a PostgreSQL warehouse"]
async fn second_run_fully_purges_previous_rows() {
    let pool = pool().await;

    replace_daily_prices(&pool, SCHEMA, "PURGE", &batch("PURGE", 90)).await.unwrap();
    assert_eq!(rows(&pool, "PURGE").await.len(), 90);

    replace_daily_prices(&pool, SCHEMA, "PURGE", &batch("PURGE", 5)).await.unwrap();
    assert_eq!(rows(&pool, "PURGE").await.len(), 5);

    // An empty batch is a legal full refresh and empties the table.
    replace_daily_prices(&pool, SCHEMA, "PURGE", &[]).await.unwrap();
    assert!(rows(&pool, "PURGE").await.is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL and a PostgreSQL warehouse"]
async fn failed_load_leaves_table_untouched() {
    let pool = pool().await;
    let good = batch("ATOM", 3);
    replace_daily_prices(&pool, SCHEMA, "ATOM", &good).await.unwrap();
    let before = rows(&pool, "ATOM").await;

    // Duplicate (symbol, date) violates the primary key on the second
    // insert, after the delete and first insert already ran.
    let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    let bad = vec![record("ATOM", date, 0.0), record("ATOM", date, 1.0)];
    let err = replace_daily_prices(&pool, SCHEMA, "ATOM", &bad).await.unwrap_err();
    assert!(err.to_string().contains("insert"), "unexpected error: {err}");

    assert_eq!(rows(&pool, "ATOM").await, before);
}
