use crate::archive::archive_feed;
use crate::catalog::{Catalog, parse_quantity};
use crate::config::{ARCHIVE_DIR, ARCHIVE_PREFIX, CSV_LOCAL_FILE};
use crate::feed::{self, StockRecord};
use crate::ftp::FeedSource;
use crate::progress;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Fatal pipeline failure, tagged with the stage that raised it. Per-record
/// problems never surface here; they are folded into the summary instead.
#[derive(Debug, Error)]
#[error("stage `{stage}` failed: {message}")]
pub struct SyncError {
    stage: &'static str,
    message: String,
}

impl SyncError {
    fn fatal(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Updated,
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub total: usize,
    pub updated: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::NotFound => self.not_found += 1,
            SyncOutcome::Failed(_) => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub feed_path: PathBuf,
    pub archive_dir: PathBuf,
    pub archive_prefix: String,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            feed_path: PathBuf::from(CSV_LOCAL_FILE.as_str()),
            archive_dir: PathBuf::from(ARCHIVE_DIR.as_str()),
            archive_prefix: ARCHIVE_PREFIX.clone(),
        }
    }
}

pub struct SyncPipeline<S, C> {
    source: S,
    catalog: C,
    config: SyncConfig,
}

impl<S: FeedSource, C: Catalog> SyncPipeline<S, C> {
    pub fn new(source: S, catalog: C, config: SyncConfig) -> Self {
        Self {
            source,
            catalog,
            config,
        }
    }

    /// Drives fetch → verify → normalize → per-record sync → archive. Only
    /// the bracketing stages can abort; record failures stay isolated.
    pub async fn run(&self) -> Result<SyncSummary, SyncError> {
        self.source
            .fetch(&self.config.feed_path)
            .await
            .map_err(|err| SyncError::fatal("fetch", err.to_string()))?;

        // A fetch that reports success is not trusted on its own.
        if !self.config.feed_path.exists() {
            return Err(SyncError::fatal(
                "verify",
                format!("feed missing at {}", self.config.feed_path.display()),
            ));
        }

        let records = feed::read_records(&self.config.feed_path)
            .map_err(|err| SyncError::fatal("normalize", err.to_string()))?;
        info!(target = "stocksync", total = records.len(), "feed records read");

        let summary = self.sync_records(&records).await;

        // Summary goes out before the archive move: an archive failure must
        // not hide how many updates were already applied.
        info!(
            target = "stocksync",
            total = summary.total,
            updated = summary.updated,
            not_found = summary.not_found,
            failed = summary.failed,
            "sync finished",
        );

        let archived = archive_feed(
            &self.config.feed_path,
            &self.config.archive_dir,
            &self.config.archive_prefix,
        )
        .map_err(|err| SyncError::fatal("archive", err.to_string()))?;
        info!(target = "stocksync", path = %archived.display(), "feed archived");

        Ok(summary)
    }

    async fn sync_records(&self, records: &[StockRecord]) -> SyncSummary {
        let bar = progress::sync_bar(records.len() as u64);
        let mut summary = SyncSummary {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            let outcome = self.sync_one(record).await;
            match &outcome {
                SyncOutcome::Updated => {}
                SyncOutcome::NotFound => {
                    warn!(target = "stocksync", identity = %record.identity, "no catalog match");
                }
                SyncOutcome::Failed(detail) => {
                    warn!(
                        target = "stocksync",
                        identity = %record.identity,
                        error = %detail,
                        "record sync failed",
                    );
                }
            }
            summary.record(&outcome);
            bar.inc(1);
        }
        bar.finish();
        summary
    }

    async fn sync_one(&self, record: &StockRecord) -> SyncOutcome {
        // An empty identity must never reach the catalog search: an empty
        // product-code filter is no filter at all and would match arbitrary
        // products.
        if record.identity.trim().is_empty() {
            return SyncOutcome::NotFound;
        }
        let target = match self.catalog.find_product(&record.identity).await {
            Ok(Some(target)) => target,
            Ok(None) => return SyncOutcome::NotFound,
            Err(err) => return SyncOutcome::Failed(err.to_string()),
        };
        match self
            .catalog
            .update_stock(&target, parse_quantity(&record.quantity))
            .await
        {
            Ok(()) => SyncOutcome::Updated,
            Err(err) => SyncOutcome::Failed(err.to_string()),
        }
    }
}
