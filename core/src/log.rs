//! Output sink for an import run: level-tagged progress messages plus the
//! append-only retry file.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

#[async_trait]
pub trait ImportLog: Send {
    fn info(&mut self, text: &str);
    fn error(&mut self, text: &str);
    /// Record a line that needs manual reprocessing.
    async fn retry(&mut self, line: &str) -> io::Result<()>;
}

/// `ImportLog` backed by `tracing` events and a retry file.
///
/// The file is opened on the first retry, so a clean run leaves no file
/// behind. Each entry is flushed immediately.
#[derive(Debug)]
pub struct TracingLog {
    retry_path: PathBuf,
    retry_file: Option<File>,
}

impl TracingLog {
    pub fn new(retry_path: impl Into<PathBuf>) -> Self {
        Self {
            retry_path: retry_path.into(),
            retry_file: None,
        }
    }

    pub fn retry_path(&self) -> &Path {
        &self.retry_path
    }

    async fn retry_file(&mut self) -> io::Result<&mut File> {
        if self.retry_file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.retry_path)
                .await?;
            self.retry_file = Some(file);
        }
        self.retry_file
            .as_mut()
            .ok_or_else(|| io::Error::other("retry file unavailable"))
    }
}

#[async_trait]
impl ImportLog for TracingLog {
    fn info(&mut self, text: &str) {
        info!("{text}");
    }

    fn error(&mut self, text: &str) {
        error!("{text}");
    }

    async fn retry(&mut self, line: &str) -> io::Result<()> {
        let file = self.retry_file().await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;
        warn!(retry_log = %self.retry_path.display(), "queued for retry: {line}");
        Ok(())
    }
}
