use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unable to prepare archive dir: {0}")]
    Prepare(String),
    #[error("unable to move feed into archive: {0}")]
    Move(String),
}

/// Moves the processed feed under `dir` as `<prefix>_<timestamp>.csv` so the
/// next run cannot pick up stale data. Returns the archived path.
pub fn archive_feed(feed: &Path, dir: &Path, prefix: &str) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(dir).map_err(|err| ArchiveError::Prepare(err.to_string()))?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    let target = dir.join(format!("{prefix}_{stamp}.csv"));
    fs::rename(feed, &target).map_err(|err| ArchiveError::Move(err.to_string()))?;
    Ok(target)
}
