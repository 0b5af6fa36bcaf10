use std::time::Duration;

use homevalue_core::{
    ApiResponse, CoreError, FeatureSet, RetryConfig, RetryingClient, ServiceConfig,
    ValuationGateway, ValuationModel, ValuationResult,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cli::{Cli, WhatIfArgs};
use crate::error::CliError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WhatIfData {
    features: FeatureSet,
    valuation: ValuationResult,
}

/// Environment configuration with command-line overrides applied.
pub fn config(cli: &Cli) -> Result<ServiceConfig, CliError> {
    configure(cli, ServiceConfig::from_env()?)
}

fn configure(cli: &Cli, mut config: ServiceConfig) -> Result<ServiceConfig, CliError> {
    if let Some(url) = &cli.model_url {
        config = config.with_model_url(url.as_str())?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_response_timeout(Duration::from_millis(timeout_ms));
    }
    Ok(config)
}

pub async fn what_if(args: &WhatIfArgs, config: &ServiceConfig) -> Result<ApiResponse<Value>, CliError> {
    let retry = if args.no_retry {
        RetryConfig::no_retry()
    } else {
        config.retry.clone()
    };
    let client = RetryingClient::new(ValuationGateway::from_config(config), retry);
    value_candidate(&args.features(), &client).await
}

pub async fn health(config: &ServiceConfig) -> Result<ApiResponse<Value>, CliError> {
    report_health(&ValuationGateway::from_config(config)).await
}

pub async fn model_info(config: &ServiceConfig) -> Result<ApiResponse<Value>, CliError> {
    describe_model(&ValuationGateway::from_config(config)).await
}

async fn value_candidate<M: ValuationModel>(
    features: &FeatureSet,
    model: &M,
) -> Result<ApiResponse<Value>, CliError> {
    features.validate().map_err(CoreError::from)?;

    let valuation = model.predict(features).await?;
    info!(
        predicted_price = valuation.predicted_price,
        "what-if valuation completed"
    );

    let data = serde_json::to_value(WhatIfData {
        features: *features,
        valuation,
    })?;
    Ok(ApiResponse::success_with_message("Valuation completed", data))
}

async fn report_health<M: ValuationModel>(model: &M) -> Result<ApiResponse<Value>, CliError> {
    let health = model.check_health().await;
    Ok(ApiResponse::success_with_message(
        "Health check completed",
        serde_json::to_value(health)?,
    ))
}

async fn describe_model<M: ValuationModel>(model: &M) -> Result<ApiResponse<Value>, CliError> {
    match model.model_info().await {
        Some(info) => Ok(ApiResponse::success_with_message(
            "Model info retrieved",
            serde_json::to_value(info)?,
        )),
        None => Ok(ApiResponse::failure(
            503,
            "Valuation service unavailable",
            "model info is unavailable",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use clap::Parser;
    use homevalue_core::{HttpResponse, ScriptedHttpClient, ScriptedReply};

    fn features() -> FeatureSet {
        FeatureSet {
            square_footage: 1850.0,
            bedrooms: 3.0,
            bathrooms: 2.5,
            year_built: 1995.0,
            lot_size: 6_000.0,
            distance_to_city_center: 4.2,
            school_rating: 8.0,
        }
    }

    fn gateway(replies: Vec<ScriptedReply>) -> (ValuationGateway, Arc<ScriptedHttpClient>) {
        let transport = Arc::new(ScriptedHttpClient::new(replies));
        (
            ValuationGateway::new(transport.clone(), "http://model.test"),
            transport,
        )
    }

    #[tokio::test]
    async fn what_if_echoes_features_with_valuation() {
        let (gateway, _) = gateway(vec![ScriptedReply::Respond(HttpResponse::ok_json(
            r#"{"predicted_price":401000.0}"#,
        ))]);

        let response = value_candidate(&features(), &gateway).await.expect("valuation");

        let data = response.data.expect("data");
        assert_eq!(data["valuation"]["predictedPrice"], 401000.0);
        assert_eq!(data["features"]["squareFootage"], 1850.0);
    }

    #[tokio::test]
    async fn invalid_features_never_reach_the_model() {
        let (gateway, transport) = gateway(Vec::new());
        let candidate = FeatureSet {
            bedrooms: 0.0,
            ..features()
        };

        let error = value_candidate(&candidate, &gateway)
            .await
            .expect_err("invalid");

        assert_eq!(error.exit_code(), 2);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_model_reports_unavailable_health() {
        let (gateway, _) = gateway(Vec::new());

        let response = report_health(&gateway).await.expect("health");

        assert!(response.is_success());
        assert_eq!(response.data.expect("data")["state"], "unavailable");
    }

    #[test]
    fn invalid_model_url_override_is_a_validation_error() {
        let cli = Cli::parse_from(["homevalue", "--model-url", "ftp://model.test", "health"]);

        let error = configure(&cli, ServiceConfig::default()).expect_err("bad url");

        assert!(matches!(&error, CliError::Core(core) if core.http_status() == 400));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn overrides_replace_environment_values() {
        let cli = Cli::parse_from([
            "homevalue",
            "--model-url",
            "http://model.test/",
            "--timeout-ms",
            "250",
            "health",
        ]);

        let config = configure(&cli, ServiceConfig::default()).expect("config");

        assert_eq!(config.model_base_url, "http://model.test");
        assert_eq!(config.response_timeout, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn missing_model_info_is_a_failure_envelope() {
        let (gateway, _) = gateway(Vec::new());

        let response = describe_model(&gateway).await.expect("envelope");

        assert_eq!(response.status, 503);
        assert!(response.data.is_none());
    }
}
