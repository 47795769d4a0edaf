use crate::config::{CSV_REMOTE_PATH, FTP_HOST, FTP_PASSWORD, FTP_USER};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use suppaftp::FtpStream;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("FTP_HOST and CSV_REMOTE_PATH must be set")]
    MissingConfig,
    #[error("ftp session failed: {0}")]
    Session(String),
    #[error("download failed: {0}")]
    Download(String),
}

/// Source of the raw inventory feed. The orchestrator only requires that a
/// successful `fetch` materializes the file at `dest`.
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    async fn fetch(&self, dest: &Path) -> Result<(), FetchError>;
}

#[derive(Debug, Clone)]
pub struct FtpFetcher {
    host: String,
    user: String,
    password: String,
    remote_path: String,
}

impl FtpFetcher {
    pub fn from_env() -> Result<Self, FetchError> {
        if FTP_HOST.is_empty() || CSV_REMOTE_PATH.is_empty() {
            return Err(FetchError::MissingConfig);
        }
        Ok(Self {
            host: FTP_HOST.clone(),
            user: FTP_USER.clone(),
            password: FTP_PASSWORD.clone(),
            remote_path: CSV_REMOTE_PATH.clone(),
        })
    }
}

impl FeedSource for FtpFetcher {
    async fn fetch(&self, dest: &Path) -> Result<(), FetchError> {
        let fetcher = self.clone();
        let dest: PathBuf = dest.to_path_buf();
        tokio::task::spawn_blocking(move || fetcher.download(&dest))
            .await
            .map_err(|err| FetchError::Session(err.to_string()))?
    }
}

impl FtpFetcher {
    /// Blocking download; runs on the blocking pool.
    fn download(&self, dest: &Path) -> Result<(), FetchError> {
        let addr = if self.host.contains(':') {
            self.host.clone()
        } else {
            format!("{}:21", self.host)
        };
        let mut session =
            FtpStream::connect(&addr).map_err(|err| FetchError::Session(err.to_string()))?;
        if let Err(err) = session.login(&self.user, &self.password) {
            let _ = session.quit();
            return Err(FetchError::Session(err.to_string()));
        }
        info!(target = "stocksync.ftp", host = %self.host, "ftp session established");

        // Session must be closed on every exit path, including retrieval errors.
        let result = retrieve(&mut session, &self.remote_path, dest);
        let _ = session.quit();
        if result.is_ok() {
            info!(target = "stocksync.ftp", path = %dest.display(), "feed downloaded");
        }
        result
    }
}

fn retrieve(session: &mut FtpStream, remote: &str, dest: &Path) -> Result<(), FetchError> {
    let mut reader = session
        .retr_as_stream(remote)
        .map_err(|err| FetchError::Download(err.to_string()))?;
    let mut file = File::create(dest).map_err(|err| FetchError::Download(err.to_string()))?;
    io::copy(&mut reader, &mut file).map_err(|err| FetchError::Download(err.to_string()))?;
    session
        .finalize_retr_stream(reader)
        .map_err(|err| FetchError::Download(err.to_string()))?;
    Ok(())
}
