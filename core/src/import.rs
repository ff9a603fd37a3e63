//! Rate-limited bulk creation of institutions from a line-oriented input.
//!
//! # Design
//! One line is one institution name. Lines are handled strictly in order with
//! at most one request in flight, so log entries follow input order and the
//! retry file needs no locking. The run suspends only while waiting for a
//! rate-limiter token and while the transport executes a request.
//!
//! A 401 ends the run: every later request would carry the same token.
//! Re-running the same file is safe because existing names come back as 409.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::client::{check_status, InstitutionClient};
use crate::error::{ApiError, ImportError, TransportError};
use crate::http::{HttpResponse, Transport};
use crate::log::ImportLog;
use crate::rate_limit::TokenBucket;
use crate::types::CreateInstitution;

/// Classification of one create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Created,
    Duplicate,
    /// Written to the retry log; not retried in this run.
    Retry,
    Unauthorized,
}

impl ImportOutcome {
    pub fn from_response(response: &HttpResponse) -> Self {
        match check_status(response) {
            Ok(()) => ImportOutcome::Created,
            Err(ApiError::Duplicate { .. }) => ImportOutcome::Duplicate,
            Err(ApiError::Unauthorized) => ImportOutcome::Unauthorized,
            Err(_) => ImportOutcome::Retry,
        }
    }

    pub fn from_transport_error(err: &TransportError) -> Self {
        match err.status {
            Some(401) => ImportOutcome::Unauthorized,
            _ => ImportOutcome::Retry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Input exhausted.
    #[default]
    Completed,
    /// Stopped at the first 401.
    AuthenticationFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub requests: usize,
    pub created: usize,
    pub duplicates: usize,
    pub retried: usize,
    pub skipped: usize,
    pub status: RunStatus,
}

pub struct Importer<T, L> {
    transport: T,
    client: InstitutionClient,
    limiter: TokenBucket,
    log: L,
}

impl<T: Transport, L: ImportLog> Importer<T, L> {
    pub fn new(transport: T, client: InstitutionClient, limiter: TokenBucket, log: L) -> Self {
        Self {
            transport,
            client,
            limiter,
            log,
        }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn into_log(self) -> L {
        self.log
    }

    /// Create one institution per non-blank line of `input`.
    ///
    /// Only input read failures and retry-log write failures are errors; an
    /// authentication failure is reported through `ImportSummary::status`.
    /// A line that is not valid UTF-8 goes to the retry log, with the bad
    /// bytes replaced, and no request is made for it.
    pub async fn run<R>(&mut self, mut input: R) -> Result<ImportSummary, ImportError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = ImportSummary::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .await
                .map_err(ImportError::Input)?;
            if read == 0 {
                break;
            }

            let raw = strip_line_ending(&buf);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(err) => {
                    let lossy = String::from_utf8_lossy(raw);
                    warn!(%err, line = %lossy, "input line is not valid UTF-8");
                    summary.retried += 1;
                    self.log
                        .retry(&lossy)
                        .await
                        .map_err(ImportError::RetryLog)?;
                    continue;
                }
            };
            let name = line.trim();
            if name.is_empty() {
                summary.skipped += 1;
                continue;
            }

            self.limiter.acquire().await;
            summary.requests += 1;

            match self.submit(name).await {
                ImportOutcome::Created => {
                    summary.created += 1;
                    self.log.info(&format!("created institution: {name}"));
                }
                ImportOutcome::Duplicate => {
                    summary.duplicates += 1;
                    self.log.info(&format!("institution already exists: {name}"));
                }
                ImportOutcome::Retry => {
                    summary.retried += 1;
                    self.log.retry(line).await.map_err(ImportError::RetryLog)?;
                }
                ImportOutcome::Unauthorized => {
                    self.log.error(&format!(
                        "authentication failed while creating {name}; check the token and rerun"
                    ));
                    summary.status = RunStatus::AuthenticationFailed;
                    break;
                }
            }
        }

        Ok(summary)
    }

    async fn submit(&self, name: &str) -> ImportOutcome {
        let request = match self
            .client
            .build_create_institution(&CreateInstitution::named(name))
        {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, institution = name, "could not build create request");
                return ImportOutcome::Retry;
            }
        };

        match self.transport.execute(request).await {
            Ok(response) => ImportOutcome::from_response(&response),
            Err(err) => {
                warn!(%err, institution = name, "create request failed");
                ImportOutcome::from_transport_error(&err)
            }
        }
    }
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
