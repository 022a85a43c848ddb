use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use reportgen_compendium::client::CompendiumClient;
use reportgen_worker::adapters::{
    CompendiumSource, PgReportRepository, S3ArtifactStore, SqsJobQueue,
};
use reportgen_worker::builder::ReportBuilder;
use reportgen_worker::config::WorkerConfig;
use reportgen_worker::pool::WorkerPool;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = WorkerConfig::from_env()?;

    // One connection per worker plus one spare.
    let max_connections = u32::try_from(config.max_concurrency)?.saturating_add(1);
    let db = reportgen_db::pool::connect(&config.database_url, max_connections).await?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let s3 = reportgen_storage::client::build_client(&aws_config, config.s3_endpoint.as_deref());
    let sqs = reportgen_queue::client::build_client(&aws_config, config.sqs_endpoint.as_deref());

    let compendium = CompendiumClient::new(&config.compendium_base_url, config.source_timeout)?;

    let builder = ReportBuilder::new(
        Arc::new(PgReportRepository::new(db)),
        Arc::new(CompendiumSource::new(compendium)),
        Arc::new(S3ArtifactStore::new(s3, &config.s3_bucket)),
    );

    let pool = WorkerPool::new(
        Arc::new(SqsJobQueue::new(sqs)),
        Arc::new(builder),
        &config.sqs_queue,
        config.max_concurrency,
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {e}");
            return;
        }
        tracing::info!("shutdown signal received");
        on_signal.cancel();
    });

    pool.start(cancel).await?;
    Ok(())
}
