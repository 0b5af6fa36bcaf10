//! Bridge between the internal valuation types and the external pricing
//! model's HTTP schema.
//!
//! # Endpoints
//!
//! | Operation | Request | Failure behavior |
//! |-----------|---------|------------------|
//! | [`predict`](ValuationModel::predict) | `POST {base}/predict` | `ServiceUnavailable` |
//! | [`check_health`](ValuationModel::check_health) | `GET {base}/health` | degrades to `Unavailable` |
//! | [`model_info`](ValuationModel::model_info) | `GET {base}/model-info` | degrades to `None` |
//!
//! # Wire mapping
//!
//! | internal | external | transform |
//! |----------|----------|-----------|
//! | `square_footage` | `square_footage` | rounded |
//! | `year_built` | `year_built` | rounded |
//! | `lot_size` | `lot_size` | rounded |
//! | `bedrooms` | `bedrooms` | rounded |
//! | `bathrooms` | `bathrooms` | as is |
//! | `distance_to_city_center` | `distance_to_city_center` | as is |
//! | `school_rating` | `school_rating` | as is |

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
use crate::{
    CoreError, FeatureSet, ModelInfo, ServiceConfig, ServiceFailure, ValuationResult,
};

/// Body text reported when the model cannot be reached for a health probe.
pub const UNAVAILABLE_DETAIL: &str = "valuation model is unavailable";

/// Liveness of the external model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelHealthState {
    Available,
    Unavailable,
}

/// Result of a health probe; never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHealth {
    pub state: ModelHealthState,
    pub detail: String,
}

impl ModelHealth {
    pub fn available(detail: impl Into<String>) -> Self {
        Self {
            state: ModelHealthState::Available,
            detail: detail.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            state: ModelHealthState::Unavailable,
            detail: String::from(UNAVAILABLE_DETAIL),
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == ModelHealthState::Available
    }
}

/// Contract of anything that can value a [`FeatureSet`].
///
/// Implemented by [`ValuationGateway`] and by the retrying decorator
/// [`crate::RetryingClient`].
pub trait ValuationModel: Send + Sync {
    /// Single prediction.
    ///
    /// # Errors
    ///
    /// [`CoreError::ServiceUnavailable`] on transport failure, non-2xx status
    /// or an undecodable body.
    fn predict<'a>(
        &'a self,
        features: &'a FeatureSet,
    ) -> Pin<Box<dyn Future<Output = Result<ValuationResult, CoreError>> + Send + 'a>>;

    fn check_health<'a>(&'a self) -> Pin<Box<dyn Future<Output = ModelHealth> + Send + 'a>>;

    fn model_info<'a>(&'a self) -> Pin<Box<dyn Future<Output = Option<ModelInfo>> + Send + 'a>>;
}

impl<T: ValuationModel + ?Sized> ValuationModel for Arc<T> {
    fn predict<'a>(
        &'a self,
        features: &'a FeatureSet,
    ) -> Pin<Box<dyn Future<Output = Result<ValuationResult, CoreError>> + Send + 'a>> {
        (**self).predict(features)
    }

    fn check_health<'a>(&'a self) -> Pin<Box<dyn Future<Output = ModelHealth> + Send + 'a>> {
        (**self).check_health()
    }

    fn model_info<'a>(&'a self) -> Pin<Box<dyn Future<Output = Option<ModelInfo>> + Send + 'a>> {
        (**self).model_info()
    }
}

/// Outbound body in the model's schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelRequest {
    pub square_footage: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub year_built: i64,
    pub lot_size: i64,
    pub distance_to_city_center: f64,
    pub school_rating: f64,
}

impl From<&FeatureSet> for ModelRequest {
    fn from(features: &FeatureSet) -> Self {
        Self {
            square_footage: features.square_footage.round() as i64,
            bedrooms: features.bedrooms.round() as i64,
            bathrooms: features.bathrooms,
            year_built: features.year_built.round() as i64,
            lot_size: features.lot_size.round() as i64,
            distance_to_city_center: features.distance_to_city_center,
            school_rating: features.school_rating,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelPrediction {
    predicted_price: f64,
    #[serde(default)]
    confidence_lower: Option<f64>,
    #[serde(default)]
    confidence_upper: Option<f64>,
    #[serde(default)]
    model_version: Option<String>,
}

impl From<ModelPrediction> for ValuationResult {
    fn from(prediction: ModelPrediction) -> Self {
        Self {
            predicted_price: prediction.predicted_price,
            confidence_lower: prediction.confidence_lower,
            confidence_upper: prediction.confidence_upper,
            model_version: prediction.model_version,
        }
    }
}

/// One HTTP call per operation against the external model. Never retries.
#[derive(Clone)]
pub struct ValuationGateway {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    response_timeout: Duration,
}

impl ValuationGateway {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            response_timeout: Duration::from_secs(30),
        }
    }

    /// Gateway over a reqwest transport bounded by the configured timeouts.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(config.connect_timeout));
        Self::new(http_client, config.model_base_url.as_str())
            .with_response_timeout(config.response_timeout)
    }

    pub fn with_response_timeout(mut self, response_timeout: Duration) -> Self {
        self.response_timeout = response_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Executes `request` under the end-to-end bound; an elapsed bound drops
    /// the in-flight transport future.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CoreError> {
        let url = request.url.clone();
        match tokio::time::timeout(self.response_timeout, self.http_client.execute(request)).await
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(error)) => Err(transport_error(&url, &error)),
            Err(_) => Err(CoreError::service_unavailable(
                ServiceFailure::Timeout,
                format!(
                    "no response from {url} within {} ms",
                    self.response_timeout.as_millis()
                ),
            )),
        }
    }

    async fn predict_once(&self, features: &FeatureSet) -> Result<ValuationResult, CoreError> {
        let payload = ModelRequest::from(features);
        let body = serde_json::to_string(&payload)
            .map_err(|e| CoreError::internal(format!("failed to encode prediction request: {e}")))?;
        debug!(body = %body, "sending prediction request");

        let request = HttpRequest::post(self.url("/predict"))
            .with_header("accept", "application/json")
            .with_json_body(body)
            .with_timeout(self.response_timeout);

        let response = self.send(request).await?;

        if !response.is_success() {
            error!(
                status = response.status,
                body = %response.body,
                request = ?payload,
                "prediction rejected by valuation model"
            );
            return Err(CoreError::service_unavailable(
                ServiceFailure::Status(response.status),
                response.body,
            ));
        }

        let prediction: ModelPrediction = serde_json::from_str(&response.body).map_err(|e| {
            CoreError::service_unavailable(
                ServiceFailure::Decode,
                format!("malformed prediction payload ({e}): {}", response.body),
            )
        })?;
        debug!(predicted_price = prediction.predicted_price, "received prediction");
        Ok(prediction.into())
    }

    async fn probe(&self, path: &str) -> Result<HttpResponse, CoreError> {
        let request = HttpRequest::get(self.url(path)).with_timeout(self.response_timeout);
        let response = self.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(CoreError::service_unavailable(
                ServiceFailure::Status(response.status),
                response.body,
            ))
        }
    }
}

impl ValuationModel for ValuationGateway {
    fn predict<'a>(
        &'a self,
        features: &'a FeatureSet,
    ) -> Pin<Box<dyn Future<Output = Result<ValuationResult, CoreError>> + Send + 'a>> {
        Box::pin(self.predict_once(features))
    }

    fn check_health<'a>(&'a self) -> Pin<Box<dyn Future<Output = ModelHealth> + Send + 'a>> {
        Box::pin(async move {
            match self.probe("/health").await {
                Ok(response) => {
                    debug!(status = %response.body, "valuation model health");
                    ModelHealth::available(response.body)
                }
                Err(error) => {
                    warn!(%error, "valuation model health check failed");
                    ModelHealth::unavailable()
                }
            }
        })
    }

    fn model_info<'a>(&'a self) -> Pin<Box<dyn Future<Output = Option<ModelInfo>> + Send + 'a>> {
        Box::pin(async move {
            let response = match self.probe("/model-info").await {
                Ok(response) => response,
                Err(error) => {
                    warn!(%error, "failed to fetch model info");
                    return None;
                }
            };
            match serde_json::from_str::<ModelInfo>(&response.body) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!(error = %e, "model info payload is malformed");
                    None
                }
            }
        })
    }
}

fn transport_error(url: &str, error: &HttpError) -> CoreError {
    let failure = match error.kind() {
        HttpErrorKind::Timeout => ServiceFailure::Timeout,
        HttpErrorKind::Connect => ServiceFailure::Connect,
        HttpErrorKind::Request | HttpErrorKind::Body => ServiceFailure::Transport,
    };
    CoreError::service_unavailable(failure, format!("{url}: {}", error.message()))
}
