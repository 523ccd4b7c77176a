//! Authorization response error types.
//!
//! Every failure here means a security-relevant artifact (a code, a token,
//! a handle) could not be produced. None of them are recovered locally.

use std::fmt;

use crate::token::jwt::JwtError;

/// Errors that can occur while generating an authorization response.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Claim minting or compact-token signing failed.
    #[error("Token creation failed: {message}")]
    TokenCreation {
        /// Description of the failure.
        message: String,
    },

    /// A store write (or read) did not complete.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The provider or a client is misconfigured, e.g. no signing certificate.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `TokenCreation` error.
    #[must_use]
    pub fn token_creation(message: impl Into<String>) -> Self {
        Self::TokenCreation {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error points at a deployment defect rather
    /// than a per-request condition.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TokenCreation { .. } => ErrorCategory::Token,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }

    /// Returns the OAuth 2.0 error code reported to the client.
    ///
    /// All response-generation failures are server-side.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::TokenCreation { .. } | Self::Storage { .. } | Self::Configuration { .. } => {
                "server_error"
            }
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        Self::token_creation(err.to_string())
    }
}

/// Categories of response-generation errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Claim minting or signing.
    Token,
    /// Store failures.
    Infrastructure,
    /// Configuration errors.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}
