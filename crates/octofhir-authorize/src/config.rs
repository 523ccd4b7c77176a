//! Authorization response configuration.
//!
//! Covers token lifetimes, the provider's signing key material and the
//! size of opaque handles.
//!
//! # Example (TOML)
//!
//! ```toml
//! issuer = "https://auth.example.com"
//!
//! [tokens]
//! authorization_code_lifetime = "5m"
//! identity_token_lifetime = "5m"
//! access_token_lifetime = "1h"
//!
//! [signing]
//! algorithm = "RS256"
//! key_id = "2024-signing"
//! private_key_path = "/etc/octofhir/signing.key.pem"
//! public_key_path = "/etc/octofhir/signing.pub.pem"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::token::jwt::SigningAlgorithm;

/// Smallest accepted handle size in bytes (128 bits).
pub const MIN_HANDLE_ENTROPY_BYTES: usize = 16;

/// Largest accepted handle size in bytes.
pub const MAX_HANDLE_ENTROPY_BYTES: usize = 64;

/// Root configuration for authorization response generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorizeConfig {
    /// Issuer URL (used in token `iss` claim).
    pub issuer: String,

    /// Token lifetimes.
    pub tokens: TokenConfig,

    /// Provider signing key configuration.
    pub signing: SigningConfig,

    /// Opaque handle configuration.
    pub handles: HandleConfig,
}

impl Default for AuthorizeConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            tokens: TokenConfig::default(),
            signing: SigningConfig::default(),
            handles: HandleConfig::default(),
        }
    }
}

/// Default token lifetimes.
///
/// Identity and access token lifetimes can be overridden per client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// How long an authorization code stays redeemable.
    #[serde(with = "humantime_serde")]
    pub authorization_code_lifetime: Duration,

    /// Identity token lifetime.
    #[serde(with = "humantime_serde")]
    pub identity_token_lifetime: Duration,

    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            authorization_code_lifetime: Duration::from_secs(300), // 5 minutes
            identity_token_lifetime: Duration::from_secs(300),     // 5 minutes
            access_token_lifetime: Duration::from_secs(3600),      // 1 hour
        }
    }
}

/// Provider signing key configuration.
///
/// When no key paths are configured the provider runs without a signing
/// certificate; any request that needs one then fails with a configuration
/// error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Signing algorithm.
    /// Supported: "RS256", "RS384", "ES384"
    pub algorithm: String,

    /// Key ID placed in the JWT `kid` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// PEM-encoded private key (PKCS#8).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,

    /// PEM-encoded public key (SPKI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_path: Option<PathBuf>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            algorithm: "RS256".to_string(),
            key_id: None,
            private_key_path: None,
            public_key_path: None,
        }
    }
}

/// Opaque handle configuration (authorization codes, reference tokens).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Number of random bytes per handle. Handles are hex encoded, so the
    /// resulting string is twice as long.
    pub entropy_bytes: usize,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            entropy_bytes: MIN_HANDLE_ENTROPY_BYTES,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// The configuration source could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl AuthorizeConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the document is not valid TOML, or
    /// any error from [`AuthorizeConfig::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The issuer URL is empty
    /// - The signing algorithm is not supported
    /// - A token lifetime is zero or does not fit in 32 bits of seconds
    /// - Handles carry fewer than 128 bits of entropy, or more than 64 bytes
    ///
    /// Returns `ConfigError::Missing` if only one of the two key paths is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.signing.algorithm.parse::<SigningAlgorithm>().is_err() {
            return Err(ConfigError::InvalidValue(format!(
                "Invalid signing algorithm: '{}'. Must be RS256, RS384, or ES384",
                self.signing.algorithm
            )));
        }

        match (
            &self.signing.private_key_path,
            &self.signing.public_key_path,
        ) {
            (Some(_), None) => {
                return Err(ConfigError::Missing("signing.public_key_path".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing(
                    "signing.private_key_path".to_string(),
                ));
            }
            _ => {}
        }

        for (name, lifetime) in [
            (
                "authorization_code_lifetime",
                self.tokens.authorization_code_lifetime,
            ),
            ("identity_token_lifetime", self.tokens.identity_token_lifetime),
            ("access_token_lifetime", self.tokens.access_token_lifetime),
        ] {
            if lifetime.is_zero() {
                return Err(ConfigError::InvalidValue(format!("{} must be > 0", name)));
            }
            if u32::try_from(lifetime.as_secs()).is_err() {
                return Err(ConfigError::InvalidValue(format!(
                    "{} is too large",
                    name
                )));
            }
        }

        if !(MIN_HANDLE_ENTROPY_BYTES..=MAX_HANDLE_ENTROPY_BYTES)
            .contains(&self.handles.entropy_bytes)
        {
            return Err(ConfigError::InvalidValue(format!(
                "handles.entropy_bytes must be between {} and {}",
                MIN_HANDLE_ENTROPY_BYTES, MAX_HANDLE_ENTROPY_BYTES
            )));
        }

        Ok(())
    }
}
