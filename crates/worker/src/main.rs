use anyhow::Context;
use clap::Parser;
use pricefeed_core::ingest::alpha_vantage::AlphaVantageClient;
use pricefeed_core::ingest::provider::MarketDataProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod pipeline;

#[derive(Debug, Parser)]
#[command(name = "pricefeed_worker")]
struct Args {
    /// Ticker symbol to refresh. Defaults to PIPELINE_SYMBOL from the environment.
    #[arg(long)]
    symbol: Option<String>,

    /// Fetch and normalize, but do not touch the warehouse.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pricefeed_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let symbol = resolve_symbol(args.symbol.as_deref(), settings.default_symbol.as_deref())?;

    let provider = AlphaVantageClient::from_settings(&settings)?;

    if args.dry_run {
        let batch = pipeline::fetch_and_normalize(&provider, &symbol).await?;
        tracing::info!(
            %symbol,
            dry_run = true,
            records = batch.records.len(),
            "dry run: skipping warehouse load"
        );
        return Ok(());
    }

    let db_url = settings.require_database_url()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    pricefeed_core::storage::migrate(&pool).await?;

    let acquired = pricefeed_core::storage::lock::try_acquire_symbol_lock(&pool, &symbol).await?;
    if !acquired {
        tracing::warn!(%symbol, "symbol lock not acquired; another run in progress");
        return Ok(());
    }

    let provider_name = provider.provider_name();
    let schema = settings.warehouse_schema().to_string();

    let result = pipeline::refresh_symbol(&provider, &pool, &schema, &symbol).await;

    match &result {
        Ok(rows) => {
            let run_id = pricefeed_core::storage::runs::record_pipeline_run(
                &pool,
                &symbol,
                provider_name,
                "success",
                Some(*rows as i64),
                None,
            )
            .await?;

            tracing::info!(%symbol, rows, %run_id, "daily price refresh complete");
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(err);

            // Best-effort audit; the original failure must stay the one that
            // reaches the scheduler.
            match pricefeed_core::storage::runs::record_pipeline_run(
                &pool,
                &symbol,
                provider_name,
                "error",
                None,
                Some(&format!("{err:#}")),
            )
            .await
            {
                Ok(run_id) => {
                    tracing::error!(%symbol, %run_id, error = %err, "daily price refresh failed")
                }
                Err(audit_err) => {
                    tracing::warn!(%symbol, error = %audit_err, "failed to record failed run")
                }
            }
        }
    }

    let _ = pricefeed_core::storage::lock::release_symbol_lock(&pool, &symbol).await;

    result.map(|_| ())
}

fn init_sentry(settings: &pricefeed_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

fn resolve_symbol(arg: Option<&str>, default_symbol: Option<&str>) -> anyhow::Result<String> {
    let symbol = arg.or(default_symbol).map(str::trim).unwrap_or("");
    anyhow::ensure!(
        !symbol.is_empty(),
        "no symbol given: pass --symbol or set PIPELINE_SYMBOL"
    );
    Ok(symbol.to_ascii_uppercase())
}
