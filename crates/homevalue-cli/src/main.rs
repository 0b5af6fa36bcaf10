mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use homevalue_core::ApiResponse;
use serde_json::Value;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::{core_exit_code, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    init_tracing()?;

    let (response, code) = match commands::run(&cli).await {
        Ok(response) => {
            let code = status_exit_code(response.status);
            (response, code)
        }
        Err(CliError::Core(error)) => (ApiResponse::<Value>::from_error(&error), core_exit_code(&error)),
        Err(error) => return Err(error),
    };

    output::render(&response, cli.pretty)?;
    Ok(ExitCode::from(code))
}

fn init_tracing() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_env("HOMEVALUE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("homevalue_core=info,homevalue=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))
}

const fn status_exit_code(status: u16) -> u8 {
    match status {
        200..=299 => 0,
        400 => 2,
        404 => 3,
        503 => 5,
        _ => 6,
    }
}
