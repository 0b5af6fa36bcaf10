//! # Homevalue Core
//!
//! Market analytics and model-backed valuation for residential property data.
//!
//! ## Overview
//!
//! - **Statistics engine**: overall stats, yearly trend and bedroom segments
//!   over a property snapshot
//! - **Memoized analysis** with single-flight computation per statistic kind
//! - **Valuation gateway** to an external regression model over HTTP
//! - **Retrying client** with exponential backoff for transport failures
//! - **Response envelope** shared by every caller-facing surface
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Single-flight memo store and statistic cache keys |
//! | [`config`] | Environment-driven service configuration |
//! | [`domain`] | Property records, statistics and valuation types |
//! | [`envelope`] | `ApiResponse` envelope and error mapping |
//! | [`error`] | Core error types |
//! | [`gateway`] | `ValuationModel` trait and the HTTP gateway |
//! | [`http_client`] | HTTP client abstraction |
//! | [`market`] | Cached market analysis service |
//! | [`retry`] | Backoff policy and `RetryingClient` |
//! | [`statistics`] | Pure statistics functions |
//! | [`store`] | Property snapshot sources |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use homevalue_core::{
//!     FeatureSet, MarketAnalysis, RetryingClient, ServiceConfig, ValuationGateway, ValuationModel,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analysis = MarketAnalysis::in_memory(load_records()?);
//!     println!("median: {}", analysis.overall().await?.median_price);
//!
//!     let config = ServiceConfig::from_env()?;
//!     let client = RetryingClient::new(ValuationGateway::from_config(&config), config.retry.clone());
//!     let estimate = client.predict(&features).await?;
//!     println!("estimate: {:.0}", estimate.predicted_price);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketAnalysis  │────▶│ SingleFlightCache│
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ PropertyStore   │────▶│ statistics::*    │
//! │ (snapshot)      │     │ (pure functions) │
//! └─────────────────┘     └──────────────────┘
//!
//! ┌─────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ RetryingClient  │────▶│ ValuationGateway │────▶│ HTTP Client      │
//! │ (backoff)       │     │ (wire mapping)   │     │ (reqwest/script) │
//! └─────────────────┘     └──────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use homevalue_core::{CoreError, ErrorKind};
//!
//! fn describe(error: &CoreError) -> &'static str {
//!     match error.kind() {
//!         ErrorKind::DataUnavailable => "no data to analyse",
//!         ErrorKind::Validation => "bad input",
//!         ErrorKind::ServiceUnavailable => "model unreachable or rejected the request",
//!         ErrorKind::Internal => "internal failure",
//!     }
//! }
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod market;
pub mod retry;
pub mod statistics;
pub mod store;

// Re-export commonly used types at crate root for convenience

// Caching
pub use cache::{CacheKey, SingleFlightCache};

// Configuration
pub use config::{ServiceConfig, DEFAULT_MODEL_URL};

// Domain models
pub use domain::{
    BedroomSegments, FeatureSet, MarketStats, ModelInfo, ModelPerformance, Page, PageRequest,
    PropertyFilter, PropertyRecord, SortDirection, SortField, TrendPoint, ValuationResult,
    MAX_PAGE_SIZE,
};

// Envelope types
pub use envelope::{ApiResponse, GENERIC_INTERNAL_MESSAGE};

// Error types
pub use error::{CoreError, ErrorKind, ServiceFailure, ValidationError};

// Valuation gateway
pub use gateway::{ModelHealth, ModelHealthState, ModelRequest, ValuationGateway, ValuationModel};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient, ScriptedHttpClient, ScriptedReply,
};

// Market analysis
pub use market::MarketAnalysis;

// Retry logic
pub use retry::{Backoff, RetryConfig, RetryingClient};

// Property snapshots
pub use store::{InMemoryPropertyStore, PropertyStore, Snapshot};
