//! Error types

use std::io;
use thiserror::Error;

/// Failure reported by a driver
///
/// Drivers only describe what went wrong; the harness decides which phase
/// the failure belongs to when it wraps the value in an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    /// Create a driver error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error message as reported by the driver
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for DriverError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for DriverError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Driver could not establish a connection
    #[error("connection error: {0}")]
    Connection(#[source] DriverError),

    /// Connection established but the liveness check failed
    #[error("ping error: {0}")]
    Liveness(#[source] DriverError),

    /// Statement rejected by the driver, or a row could not be fetched
    #[error("query error: {0}")]
    Query(#[source] DriverError),

    /// Row payload could not be decoded
    #[error("decode error at row {row}: {source}")]
    Decode {
        /// 0-based position of the failing row
        row: usize,
        /// Driver-reported cause
        #[source]
        source: DriverError,
    },

    /// Releasing a connection or cursor failed
    #[error("close error: {0}")]
    Close(#[source] DriverError),

    /// No driver registered under the requested name
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// A driver with the same name is already registered
    #[error("driver already registered: {0}")]
    DriverExists(String),

    /// Invalid state transition
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing decoded rows to the output sink failed
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Phase label for logs and metrics
    pub fn phase(&self) -> &'static str {
        use crate::metrics::labels;

        match self {
            Error::Connection(_) | Error::UnknownDriver(_) => labels::PHASE_OPEN,
            Error::Liveness(_) => labels::PHASE_VERIFY,
            Error::Query(_) => labels::PHASE_QUERY,
            Error::Decode { .. } | Error::Output(_) => labels::PHASE_ITERATE,
            Error::Close(_) => labels::PHASE_CLOSE,
            Error::DriverExists(_) | Error::InvalidState { .. } | Error::Config(_) => {
                labels::PHASE_SETUP
            }
        }
    }

    /// Create a decode error for the row at `row`
    pub fn decode(row: usize, source: DriverError) -> Self {
        Error::Decode { row, source }
    }
}
