/// Error taxonomy for the sender pipeline
///
/// Design:
/// - One variant per failure class; nothing is recovered locally
/// - Every variant carries a stable machine code and a category
/// - Categories drive log severity at the top-level caller
///
/// Usage:
/// - Library code returns `shared::errors::Result<T>`
/// - The binary converts into `anyhow::Error` only at the outermost layer
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error categories that map to logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Caller supplied input that cannot be used
    Validation,

    /// Endpoint unreachable or answering with garbage
    Network,

    /// Endpoint refused the transaction
    Contract,

    /// Local storage or key material problems
    Internal,
}

impl ErrorCategory {
    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::Network => "error",
            ErrorCategory::Contract => "warn",
            ErrorCategory::Internal => "error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Network => "network",
            ErrorCategory::Contract => "contract",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SenderError {
    /// Identity file exists but does not hold usable key material
    #[error("Corrupt identity file {path}: {reason}")]
    CorruptIdentity { path: String, reason: String },

    /// Identity file could not be read or written
    #[error("Identity storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    /// Endpoint refused the transaction (stale anchor, balance, program error)
    #[error("Submission rejected: {reason}")]
    SubmissionRejected { reason: String },
}

impl SenderError {
    pub fn corrupt_identity(path: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::CorruptIdentity {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn storage(path: impl fmt::Display, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.to_string(),
            source,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::SubmissionRejected {
            reason: reason.into(),
        }
    }

    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            SenderError::CorruptIdentity { .. } => "IDENTITY_CORRUPT",
            SenderError::Storage { .. } => "IDENTITY_STORAGE",
            SenderError::EndpointUnavailable(_) => "NETWORK_RPC_UNAVAILABLE",
            SenderError::InvalidRequest(_) => "REQUEST_INVALID",
            SenderError::Signing(_) => "SIGNING_FAILED",
            SenderError::SubmissionRejected { .. } => "SUBMISSION_REJECTED",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SenderError::CorruptIdentity { .. } | SenderError::Storage { .. } => {
                ErrorCategory::Internal
            }
            SenderError::Signing(_) => ErrorCategory::Internal,
            SenderError::EndpointUnavailable(_) => ErrorCategory::Network,
            SenderError::InvalidRequest(_) => ErrorCategory::Validation,
            SenderError::SubmissionRejected { .. } => ErrorCategory::Contract,
        }
    }
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, SenderError>;
