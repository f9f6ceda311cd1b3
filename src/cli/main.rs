//! CLI binary entry point for fashion-ingest

mod error;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use error::CliError;
use fashion_ingest::config::{CONFIG_FILENAME, IngestConfig};
use fashion_ingest::source::{RowSource, S3RowSource};
use fashion_ingest::{SalesLoader, normalize};

#[derive(Parser)]
#[command(name = "fashion-ingest")]
#[command(about = "Ingest one day of fashion store sales into the warehouse")]
#[command(version)]
struct Cli {
    /// Sale date to ingest (YYYYMMDD)
    #[arg(value_parser = parse_run_date)]
    date: NaiveDate,

    /// Path to the configuration file
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Create the warehouse schema before loading
    #[arg(long)]
    init_schema: bool,
}

/// Parse an 8-digit YYYYMMDD run date.
fn parse_run_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y%m%d").map_err(|_| CliError::InvalidDate(raw.to_string()))
}

fn main() {
    // Default to info so run milestones are visible; RUST_LOG overrides
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(&cli)) {
        tracing::error!("ingestion failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = IngestConfig::load(&cli.config)?;
    tracing::info!("ingestion started for {}", cli.date);

    let source = S3RowSource::new(&config.source).await;
    let records = source.fetch_batch().await?;
    tracing::info!("{} rows read from object store", records.len());

    // An empty batch for the target date is a successful no-op run
    let Some(batch) = normalize(&records, cli.date) else {
        tracing::warn!("no data for {}", cli.date);
        return Ok(());
    };
    tracing::info!("{} sale items to load", batch.line_count());

    let mut loader = SalesLoader::connect(&config.postgres).await?;
    if cli.init_schema {
        loader.initialize().await?;
    }

    let summary = loader.load(&batch).await?;
    tracing::info!(
        "ingestion finished: {} customers, {} products, {} sales, {} sale items in {}ms",
        summary.customers,
        summary.products,
        summary.sales,
        summary.sale_items,
        summary.duration_ms
    );

    Ok(())
}
