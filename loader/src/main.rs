use std::process::ExitCode;

use clap::Parser;
use institution_loader::Cli;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    match institution_loader::run(&cli).await {
        Ok(summary) => ExitCode::from(institution_loader::exit_code(&summary)),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
