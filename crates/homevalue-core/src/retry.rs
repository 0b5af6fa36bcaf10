//! Retry logic with exponential backoff for valuation calls.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{info, warn};

use crate::gateway::{ModelHealth, ValuationModel};
use crate::{CoreError, FeatureSet, ModelInfo, ServiceFailure, ValuationResult};

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// Uses an exponential delay between retries.
    ///
    /// The delay is calculated as `base * (factor ^ attempt)`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    /// 1s, 2s, 4s, ... without jitter.
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt.min(i32::MAX as u32) as i32);
                let seconds = base.as_secs_f64() * scale;
                let capped_seconds = seconds.min(max.as_secs_f64());

                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Configuration for the automatic retry mechanism.
///
/// Only failures without an HTTP response are ever retried; a status or an
/// undecodable body from the model is final.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Enables or disables the retry mechanism.
    pub enabled: bool,
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_timeout: bool,
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            backoff: Backoff::default(),
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}

impl RetryConfig {
    /// Exponential backoff from `base`, doubling per retry.
    pub fn exponential(base: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Exponential {
                base,
                factor: 2.0,
                max: Duration::from_secs(60),
                jitter: false,
            },
            ..Self::default()
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn should_retry(&self, error: &CoreError) -> bool {
        match error.service_failure() {
            Some(ServiceFailure::Timeout) => self.retry_on_timeout,
            Some(ServiceFailure::Connect) => self.retry_on_connect,
            Some(ServiceFailure::Transport) => true,
            Some(ServiceFailure::Status(_) | ServiceFailure::Decode) | None => false,
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Wraps a [`ValuationModel`] with bounded retries of transport failures.
///
/// Delays suspend only the calling task. The last error is returned once
/// retries are exhausted; nothing is cached.
#[derive(Debug, Clone)]
pub struct RetryingClient<M> {
    inner: M,
    config: RetryConfig,
}

impl<M: ValuationModel> RetryingClient<M> {
    pub fn new(inner: M, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    async fn predict_with_retry(&self, features: &FeatureSet) -> Result<ValuationResult, CoreError> {
        let mut retries: u32 = 0;
        loop {
            match self.inner.predict(features).await {
                Ok(result) => {
                    if retries > 0 {
                        info!(attempts = retries + 1, "valuation succeeded after retry");
                    }
                    return Ok(result);
                }
                Err(error) => {
                    let exhausted = !self.config.enabled || retries >= self.config.max_retries;
                    if exhausted || !self.config.should_retry(&error) {
                        return Err(error);
                    }

                    let delay = self.config.delay_for_attempt(retries);
                    warn!(
                        attempt = retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "valuation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
            }
        }
    }
}

impl<M: ValuationModel> ValuationModel for RetryingClient<M> {
    fn predict<'a>(
        &'a self,
        features: &'a FeatureSet,
    ) -> Pin<Box<dyn Future<Output = Result<ValuationResult, CoreError>> + Send + 'a>> {
        Box::pin(self.predict_with_retry(features))
    }

    fn check_health<'a>(&'a self) -> Pin<Box<dyn Future<Output = ModelHealth> + Send + 'a>> {
        self.inner.check_health()
    }

    fn model_info<'a>(&'a self) -> Pin<Box<dyn Future<Output = Option<ModelInfo>> + Send + 'a>> {
        self.inner.model_info()
    }
}
