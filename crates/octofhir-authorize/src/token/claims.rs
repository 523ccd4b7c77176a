//! Claim sets and the stored access token value.
//!
//! [`Claims`] is the opaque form the response generator passes around. The
//! typed [`IdentityTokenClaims`] and [`AccessTokenClaims`] are what the
//! default token issuer builds before flattening them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::token::jwt::JwtError;

/// An opaque claim set (a JSON object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Flattens any serializable claim struct into an opaque claim set.
    ///
    /// # Errors
    /// Returns an error if `claims` does not serialize to a JSON object.
    pub fn from_serializable<T: Serialize>(claims: &T) -> Result<Self, JwtError> {
        match serde_json::to_value(claims) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(JwtError::InvalidClaims(format!(
                "claim set must be a JSON object, got {}",
                other
            ))),
            Err(e) => Err(JwtError::InvalidClaims(e.to_string())),
        }
    }

    /// Converts the claim set back into a typed struct.
    ///
    /// # Errors
    /// Returns an error if the claims don't match `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, JwtError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| JwtError::InvalidClaims(e.to_string()))
    }

    /// Returns a single claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns `true` if the claim set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An access token as minted by the token issuer, before it is signed or
/// stored behind a handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The token's claims.
    pub claims: Claims,

    /// Lifetime in seconds.
    pub lifetime: u32,

    /// When the token was minted.
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,
}

impl AccessToken {
    /// Returns the instant after which the token must be rejected.
    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        self.creation_time + time::Duration::seconds(i64::from(self.lifetime))
    }
}

/// OpenID Connect identity token claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Subject (user ID).
    pub sub: String,

    /// Audience (client ID).
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Nonce from authorization request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Time the subject authenticated (Unix timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,

    /// Authentication methods used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amr: Vec<String>,
}

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    /// Issuer.
    pub iss: String,

    /// Subject (user ID).
    pub sub: String,

    /// Audience (the provider's resource endpoint).
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// JWT ID.
    pub jti: String,

    /// OAuth client ID.
    pub client_id: String,

    /// Granted scopes.
    pub scope: Vec<String>,
}

impl AccessTokenClaims {
    /// Creates a new builder for access token claims.
    #[must_use]
    pub fn builder(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        client_id: impl Into<String>,
    ) -> AccessTokenClaimsBuilder {
        AccessTokenClaimsBuilder::new(issuer, subject, client_id)
    }
}

/// Builder for `AccessTokenClaims`.
pub struct AccessTokenClaimsBuilder {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    lifetime: u32,
    client_id: String,
    scope: Vec<String>,
}

impl AccessTokenClaimsBuilder {
    fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        let iss = issuer.into();
        Self {
            aud: format!("{}/resources", iss.trim_end_matches('/')),
            iss,
            sub: subject.into(),
            iat: OffsetDateTime::now_utc().unix_timestamp(),
            lifetime: 3600,
            client_id: client_id.into(),
            scope: Vec::new(),
        }
    }

    /// Sets the issued-at time.
    #[must_use]
    pub fn issued_at(mut self, issued_at: OffsetDateTime) -> Self {
        self.iat = issued_at.unix_timestamp();
        self
    }

    /// Sets the lifetime in seconds.
    #[must_use]
    pub fn lifetime(mut self, seconds: u32) -> Self {
        self.lifetime = seconds;
        self
    }

    /// Sets the scopes.
    #[must_use]
    pub fn scope(mut self, scope: Vec<String>) -> Self {
        self.scope = scope;
        self
    }

    /// Builds the claims.
    #[must_use]
    pub fn build(self) -> AccessTokenClaims {
        AccessTokenClaims {
            iss: self.iss,
            sub: self.sub,
            aud: self.aud,
            exp: self.iat + i64::from(self.lifetime),
            iat: self.iat,
            jti: uuid::Uuid::new_v4().simple().to_string(),
            client_id: self.client_id,
            scope: self.scope,
        }
    }
}
