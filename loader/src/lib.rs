//! Command-line institution loader.
//!
//! # Overview
//! Reads a newline-delimited file of institution names and creates each one
//! through the consent API at a bounded rate. Names the API rejects
//! transiently land in a retry log; an authentication failure ends the run.
//!
//! # Exit codes
//! `0` when the input is exhausted, `2` on authentication failure, `1` when
//! the run could not start or its input or retry log failed.

pub mod cli;
pub mod transport;

use std::path::PathBuf;

use consent_core::{
    ImportError, ImportSummary, Importer, InstitutionClient, RateConfigError, RunStatus,
    TokenBucket, TracingLog,
};
use thiserror::Error;
use tokio::io::BufReader;
use tracing::info;

pub use cli::Cli;
pub use transport::UreqTransport;

pub const EXIT_AUTH_FAILURE: u8 = 2;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("invalid rate limit: {0}")]
    RateConfig(#[from] RateConfigError),

    #[error("cannot open {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Process exit code for a finished run.
pub fn exit_code(summary: &ImportSummary) -> u8 {
    match summary.status {
        RunStatus::Completed => 0,
        RunStatus::AuthenticationFailed => EXIT_AUTH_FAILURE,
    }
}

pub async fn run(cli: &Cli) -> Result<ImportSummary, LoaderError> {
    let rate = cli.rate_config();
    let limiter = TokenBucket::new(rate)?;
    let input = tokio::fs::File::open(&cli.file)
        .await
        .map_err(|source| LoaderError::OpenInput {
            path: cli.file.clone(),
            source,
        })?;

    let client = InstitutionClient::new(&cli.host, &cli.token);
    info!(
        file = %cli.file.display(),
        host = client.base_url(),
        rate = rate.tokens_per_interval,
        interval_ms = rate.interval.as_millis() as u64,
        retry_log = %cli.retry_log.display(),
        "starting institution import"
    );

    let mut importer = Importer::new(
        UreqTransport::new(cli.request_timeout()),
        client,
        limiter,
        TracingLog::new(&cli.retry_log),
    );
    let summary = importer.run(BufReader::new(input)).await?;

    info!(
        requests = summary.requests,
        created = summary.created,
        duplicates = summary.duplicates,
        retried = summary.retried,
        skipped = summary.skipped,
        status = ?summary.status,
        "import finished"
    );
    Ok(summary)
}
