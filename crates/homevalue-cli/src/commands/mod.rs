mod analytics;
mod valuation;

use homevalue_core::ApiResponse;
use serde_json::Value;

use self::analytics::Statistic;
use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ApiResponse<Value>, CliError> {
    match &cli.command {
        Command::Stats(args) => analytics::run(Statistic::Overall, args).await,
        Command::Trend(args) => analytics::run(Statistic::Trend, args).await,
        Command::Segments(args) => analytics::run(Statistic::Segments, args).await,
        Command::Property(args) => analytics::property(args),
        Command::Properties(args) => analytics::list(args),
        Command::WhatIf(args) => valuation::what_if(args, &valuation::config(cli)?).await,
        Command::Health => valuation::health(&valuation::config(cli)?).await,
        Command::ModelInfo => valuation::model_info(&valuation::config(cli)?).await,
    }
}
