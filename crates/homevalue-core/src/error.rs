use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Boundary and configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("field '{field}' must be finite")]
    NonFinite { field: &'static str },
    #[error("invalid value for {key}: '{value}'")]
    InvalidConfig { key: String, value: String },
}

/// Closed classification of every failure the core can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DataUnavailable,
    Validation,
    ServiceUnavailable,
    Internal,
}

/// Cause of a `ServiceUnavailable` error.
///
/// `Timeout`, `Connect` and `Transport` mean no HTTP response was received.
/// `Status` and `Decode` mean the model answered, so repeating the call
/// cannot change the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFailure {
    Timeout,
    Connect,
    Transport,
    Status(u16),
    Decode,
}

impl ServiceFailure {
    pub const fn is_transport(self) -> bool {
        matches!(self, Self::Timeout | Self::Connect | Self::Transport)
    }

    pub const fn status(self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }
}

impl Display for ServiceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Connect => f.write_str("connect"),
            Self::Transport => f.write_str("transport"),
            Self::Status(status) => write!(f, "status {status}"),
            Self::Decode => f.write_str("decode"),
        }
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("{message}")]
    DataUnavailable { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("valuation model unavailable ({failure}): {message}")]
    ServiceUnavailable {
        message: String,
        failure: ServiceFailure,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            message: message.into(),
        }
    }

    pub fn service_unavailable(failure: ServiceFailure, message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            failure,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            Self::Validation(_) => ErrorKind::Validation,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::DataUnavailable => "data.unavailable",
            ErrorKind::Validation => "request.invalid",
            ErrorKind::ServiceUnavailable => "model.unavailable",
            ErrorKind::Internal => "internal",
        }
    }

    pub const fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::DataUnavailable => 404,
            ErrorKind::Validation => 400,
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::Internal => 500,
        }
    }

    /// Present only for `ServiceUnavailable`.
    pub const fn service_failure(&self) -> Option<ServiceFailure> {
        match self {
            Self::ServiceUnavailable { failure, .. } => Some(*failure),
            _ => None,
        }
    }

    /// True when the failure happened before any HTTP response arrived.
    pub const fn is_transport_failure(&self) -> bool {
        match self.service_failure() {
            Some(failure) => failure.is_transport(),
            None => false,
        }
    }
}
