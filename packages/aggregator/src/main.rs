use anyhow::Context;
use tracing::info;

use aggregator::config::AggregatorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AggregatorConfig::load().context("Failed to load config")?;

    let db = common::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    info!(page_size = config.scan.page_size, "Keyword aggregation starting");
    let report = aggregator::aggregate_keywords(&db, config.scan.page_size)
        .await
        .context("Keyword aggregation failed")?;

    info!(
        files_scanned = report.files_scanned,
        owners = report.owners,
        owners_written = report.owners_written,
        owners_skipped = report.owners_skipped,
        keywords_written = report.keywords_written,
        "Keyword aggregation finished"
    );

    Ok(())
}
