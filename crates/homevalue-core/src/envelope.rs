use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::error;

use crate::{CoreError, ErrorKind};

/// Message shown to callers in place of internal error detail.
pub const GENERIC_INTERNAL_MESSAGE: &str =
    "An unexpected error occurred. Please try again later.";

/// Standard response envelope for everything the API boundary returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("Success", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            message: message.into(),
            data: Some(data),
            timestamp: OffsetDateTime::now_utc(),
            error: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
            timestamp: OffsetDateTime::now_utc(),
            error: Some(error.into()),
        }
    }

    /// Maps a core error to its boundary status. Internal detail is logged
    /// and replaced by [`GENERIC_INTERNAL_MESSAGE`].
    pub fn from_error(failure: &CoreError) -> Self {
        let status = failure.http_status();
        match failure.kind() {
            ErrorKind::DataUnavailable => {
                Self::failure(status, "Data not found", failure.to_string())
            }
            ErrorKind::Validation => Self::failure(status, "Invalid argument", failure.to_string()),
            ErrorKind::ServiceUnavailable => {
                Self::failure(status, "Valuation service unavailable", failure.to_string())
            }
            ErrorKind::Internal => {
                error!(error = ?failure, "internal error surfaced to caller");
                Self::failure(status, "Internal server error", GENERIC_INTERNAL_MESSAGE)
            }
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceFailure;

    #[test]
    fn success_envelope_omits_error() {
        let response = ApiResponse::success_with_message("Market trend retrieved", vec![1, 2]);
        let value = serde_json::to_value(&response).expect("json");

        assert_eq!(value["status"], 200);
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert!(value.get("error").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn service_failure_keeps_downstream_message() {
        let failure =
            CoreError::service_unavailable(ServiceFailure::Status(422), "bedrooms must be >= 1");
        let response = ApiResponse::<()>::from_error(&failure);

        assert_eq!(response.status, 503);
        assert!(response
            .error
            .as_deref()
            .is_some_and(|error| error.contains("bedrooms must be >= 1")));
    }

    #[test]
    fn internal_detail_is_hidden() {
        let response = ApiResponse::<()>::from_error(&CoreError::internal("cache slot mismatch"));

        assert_eq!(response.status, 500);
        assert_eq!(response.error.as_deref(), Some(GENERIC_INTERNAL_MESSAGE));
        assert!(!response.is_success());
    }

    #[test]
    fn data_unavailable_is_not_found() {
        let response = ApiResponse::<()>::from_error(&CoreError::data_unavailable("empty"));
        assert_eq!(response.status, 404);
        assert_eq!(response.message, "Data not found");
    }
}
