mod archive;
mod catalog;
mod config;
mod feed;
mod ftp;
mod http;
mod pipeline;
mod progress;

use catalog::CatalogClient;
use ftp::FtpFetcher;
use pipeline::{SyncConfig, SyncPipeline};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(target = "stocksync", "run failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let source = FtpFetcher::from_env()?;
    let catalog =
        CatalogClient::from_env().ok_or("WC_API_URL, WC_KEY and WC_SECRET must be set")?;
    let pipeline = SyncPipeline::new(source, catalog, SyncConfig::from_env());

    let summary = pipeline.run().await?;
    info!(
        target = "stocksync",
        total = summary.total,
        updated = summary.updated,
        not_found = summary.not_found,
        failed = summary.failed,
        "synchronization complete",
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
