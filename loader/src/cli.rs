use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, ArgAction, Parser};
use consent_core::RateConfig;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "load-institutions")]
#[command(about = "Create institutions in the consent API, one per line of the input file")]
pub struct Cli {
    /// Newline-delimited institution names.
    #[arg(long)]
    pub file: PathBuf,

    /// Base URL of the consent API.
    #[arg(long, env = "CONSENT_HOST")]
    pub host: String,

    /// Bearer token sent with every request.
    #[arg(long, env = "CONSENT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Requests allowed per interval.
    #[arg(long, default_value_t = 5, value_parser = value_parser!(u32).range(1..))]
    pub rate: u32,

    #[arg(long, default_value_t = 1000, value_parser = value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Bucket capacity; defaults to --rate.
    #[arg(long)]
    pub burst: Option<u32>,

    /// Lines that failed transiently are appended here.
    #[arg(long, default_value = "institutions.retry.log")]
    pub retry_log: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, value_parser = value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn rate_config(&self) -> RateConfig {
        let config = RateConfig::per_interval(self.rate, Duration::from_millis(self.interval_ms));
        match self.burst {
            Some(burst) => config.with_capacity(burst),
            None => config,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_config_uses_burst_when_given() {
        let cli = Cli::try_parse_from([
            "load-institutions",
            "--file",
            "names.txt",
            "--host",
            "http://localhost",
            "--token",
            "t",
            "--rate",
            "2",
            "--interval-ms",
            "500",
            "--burst",
            "6",
        ])
        .unwrap();
        let config = cli.rate_config();
        assert_eq!(config.tokens_per_interval, 2);
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.capacity(), 6);
    }

    #[test]
    fn verbosity_raises_level() {
        let base = ["load-institutions", "--file", "f", "--host", "h", "--token", "t"];
        let quiet = Cli::try_parse_from(base).unwrap();
        assert_eq!(quiet.log_level(), Level::INFO);

        let loud = Cli::try_parse_from(base.iter().copied().chain(["-vv"])).unwrap();
        assert_eq!(loud.log_level(), Level::TRACE);
    }
}
