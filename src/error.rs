//! Error types for the plan summary tool.
//!
//! This module provides the error hierarchy for every stage of a run:
//! plan parsing, configuration, and posting summaries to GitLab.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the plan summary tool.
#[derive(Debug, Error)]
pub enum TpsError {
    /// Plan loading and parsing errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while posting a summary.
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or parsing a plan document.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file was not found.
    #[error("Plan file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A required field is missing or has the wrong shape.
    #[error("Malformed plan at `{path}`: {message}")]
    Malformed {
        /// JSON path of the offending field, e.g. `resource_changes[2].change.actions`.
        path: String,
        /// Description of the problem.
        message: String,
    },

    /// Two resource changes share the same address.
    #[error("Duplicate resource address in plan: {address}")]
    DuplicateAddress {
        /// The duplicated address.
        address: String,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was not supplied by flag or environment.
    #[error("Missing required value: {name}")]
    MissingValue {
        /// Name of the flag or variable.
        name: String,
    },

    /// A value was supplied but is not usable.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue {
        /// Name of the flag or variable.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The `.env` file exists but could not be loaded.
    #[error("Failed to load environment file {path}: {message}")]
    EnvFile {
        /// Path to the `.env` file.
        path: PathBuf,
        /// Loader error message.
        message: String,
    },
}

/// Errors raised by the notification collaborator.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Authentication failed.
    #[error("GitLab authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// API request failed.
    #[error("GitLab API request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited.
    #[error("GitLab API rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("Network error communicating with GitLab: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid response from GitLab API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// The target project or merge request could not be addressed.
    #[error("Invalid comment target: {message}")]
    InvalidTarget {
        /// Description of the target problem.
        message: String,
    },
}

/// Result type alias for plan summary operations.
pub type Result<T> = std::result::Result<T, TpsError>;

impl TpsError {
    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Notify(NotifyError::RateLimited { .. } | NotifyError::NetworkError { .. })
        )
    }

    /// Returns the suggested retry delay in seconds, if applicable.
    #[must_use]
    pub const fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::Notify(NotifyError::RateLimited { retry_after_secs }) => Some(*retry_after_secs),
            Self::Notify(NotifyError::NetworkError { .. }) => Some(1),
            _ => None,
        }
    }
}

impl PlanError {
    /// Creates a malformed-plan error for a JSON path.
    #[must_use]
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a missing-value error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingValue { name: name.into() }
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl NotifyError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }
}
