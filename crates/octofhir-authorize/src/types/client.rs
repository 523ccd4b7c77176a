//! OAuth 2.0 client configuration relevant to response generation.

use serde::{Deserialize, Serialize};

// =============================================================================
// Signing Key Type
// =============================================================================

/// Which key a client's identity tokens are signed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningKeyType {
    /// HMAC over the client's own secret.
    ClientSecret,
    /// The provider's signing certificate.
    #[default]
    Certificate,
}

impl SigningKeyType {
    /// Returns the configuration value for this key type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientSecret => "client_secret",
            Self::Certificate => "certificate",
        }
    }
}

impl std::fmt::Display for SigningKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Access Token Type
// =============================================================================

/// How access tokens issued to a client are represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenType {
    /// A signed JWT carrying its own claims.
    #[default]
    SelfContained,
    /// An opaque handle; the claims stay server-side.
    Reference,
}

impl AccessTokenType {
    /// Returns the configuration value for this token type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfContained => "self_contained",
            Self::Reference => "reference",
        }
    }
}

impl std::fmt::Display for AccessTokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Client
// =============================================================================

/// OAuth 2.0 client registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    pub client_id: String,

    /// Shared secret. Also the HMAC key when identity tokens are signed
    /// with [`SigningKeyType::ClientSecret`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Human-readable display name.
    pub name: String,

    /// Key used to sign identity tokens.
    #[serde(default)]
    pub identity_token_signing_key_type: SigningKeyType,

    /// Access token representation.
    #[serde(default)]
    pub access_token_type: AccessTokenType,

    /// Identity token lifetime in seconds (overrides the configured default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_token_lifetime: Option<u32>,

    /// Access token lifetime in seconds (overrides the configured default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_lifetime: Option<u32>,
}

impl Client {
    /// Creates a client with default token settings.
    #[must_use]
    pub fn new(client_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            name: name.into(),
            identity_token_signing_key_type: SigningKeyType::default(),
            access_token_type: AccessTokenType::default(),
            identity_token_lifetime: None,
            access_token_lifetime: None,
        }
    }

    /// Validates the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is invalid.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() {
            return Err(ClientValidationError::EmptyClientId);
        }

        if self.name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        // HMAC signing needs something to sign with
        if self.identity_token_signing_key_type == SigningKeyType::ClientSecret
            && self.client_secret.as_deref().is_none_or(str::is_empty)
        {
            return Err(ClientValidationError::MissingSecret);
        }

        // A zero lifetime would issue tokens that are expired on arrival
        if self.identity_token_lifetime == Some(0) {
            return Err(ClientValidationError::ZeroLifetime("identityTokenLifetime"));
        }
        if self.access_token_lifetime == Some(0) {
            return Err(ClientValidationError::ZeroLifetime("accessTokenLifetime"));
        }

        Ok(())
    }
}

/// Client configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    /// Client ID is empty.
    #[error("Client ID cannot be empty")]
    EmptyClientId,

    /// Client name is empty.
    #[error("Client name cannot be empty")]
    EmptyName,

    /// Client-secret signing is configured without a secret.
    #[error("Client secret signing requires a client secret")]
    MissingSecret,

    /// A token lifetime override is zero.
    #[error("{0} must be > 0")]
    ZeroLifetime(&'static str),
}
