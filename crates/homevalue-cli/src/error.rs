use homevalue_core::{CoreError, ErrorKind, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// `Core` errors are rendered as a response envelope; the rest go to stderr.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(error) => core_exit_code(error),
            Self::Serialization(_) => 4,
            Self::Logging(_) => 6,
            Self::Io(_) => 10,
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(error: ValidationError) -> Self {
        Self::Core(CoreError::from(error))
    }
}

pub const fn core_exit_code(error: &CoreError) -> u8 {
    match error.kind() {
        ErrorKind::Validation => 2,
        ErrorKind::DataUnavailable => 3,
        ErrorKind::ServiceUnavailable => 5,
        ErrorKind::Internal => 6,
    }
}
