//! Token issuer: mints claim sets and produces signed compact tokens.
//!
//! The response generator depends only on [`TokenIssuer`]. [`JwtTokenIssuer`]
//! is the default implementation, producing JWS compact tokens with
//! `jsonwebtoken`.
//!
//! # Usage
//!
//! ```ignore
//! use octofhir_authorize::token::{JwtTokenIssuer, TokenIssuer};
//!
//! let issuer = JwtTokenIssuer::new("https://auth.example.com", &config.tokens);
//! let claims = issuer.create_identity_token_claims(&request, &subject).await?;
//! let jwt = issuer.sign(&claims, &credential).await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{Header, TokenData, Validation, decode, encode};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::config::TokenConfig;
use crate::token::claims::{AccessToken, AccessTokenClaims, Claims, IdentityTokenClaims};
use crate::token::credential::SigningCredential;
use crate::token::jwt::JwtError;
use crate::types::{Subject, ValidatedAuthorizeRequest};

/// Mints and signs tokens for a validated request.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Builds the identity token claim set.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if the claims cannot be built.
    async fn create_identity_token_claims(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<Claims>;

    /// Builds the access token claim set together with its lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if the claims cannot be built.
    async fn create_access_token(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<AccessToken>;

    /// Signs a claim set into a compact token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    async fn sign(&self, claims: &Claims, credential: &SigningCredential) -> AuthResult<String>;
}

/// Default token issuer producing JWTs.
#[derive(Debug, Clone)]
pub struct JwtTokenIssuer {
    issuer: String,
    identity_token_lifetime: u32,
    access_token_lifetime: u32,
}

impl JwtTokenIssuer {
    /// Creates a new issuer.
    ///
    /// # Arguments
    ///
    /// * `issuer` - Value of the `iss` claim
    /// * `config` - Default token lifetimes
    #[must_use]
    pub fn new(issuer: impl Into<String>, config: &TokenConfig) -> Self {
        Self {
            issuer: issuer.into(),
            identity_token_lifetime: seconds(config.identity_token_lifetime),
            access_token_lifetime: seconds(config.access_token_lifetime),
        }
    }

    /// Returns the issuer URL.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Decodes and validates a token signed by this issuer.
    ///
    /// Checks signature, issuer and expiry. Audience is left to the caller.
    ///
    /// # Errors
    /// Returns an error if decoding or validation fails.
    pub fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
        credential: &SigningCredential,
    ) -> Result<TokenData<T>, JwtError> {
        let mut validation = Validation::new(credential.algorithm());
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.validate_aud = false;

        decode(token, &credential.decoding_key(), &validation).map_err(JwtError::from)
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
    async fn create_identity_token_claims(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<Claims> {
        let lifetime = request
            .client
            .identity_token_lifetime
            .unwrap_or(self.identity_token_lifetime);
        let iat = OffsetDateTime::now_utc().unix_timestamp();

        let claims = IdentityTokenClaims {
            iss: self.issuer.clone(),
            sub: subject.subject_id.clone(),
            aud: request.client_id.clone(),
            exp: iat + i64::from(lifetime),
            iat,
            nonce: request.nonce.clone(),
            auth_time: subject
                .authentication_time
                .map(OffsetDateTime::unix_timestamp),
            amr: subject.authentication_methods.clone(),
        };

        Ok(Claims::from_serializable(&claims)?)
    }

    async fn create_access_token(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<AccessToken> {
        let lifetime = request
            .client
            .access_token_lifetime
            .unwrap_or(self.access_token_lifetime);
        let creation_time = OffsetDateTime::now_utc();

        let claims = AccessTokenClaims::builder(
            self.issuer.as_str(),
            subject.subject_id.as_str(),
            request.client_id.as_str(),
        )
        .issued_at(creation_time)
        .lifetime(lifetime)
        .scope(request.granted_scopes.clone())
        .build();

        Ok(AccessToken {
            claims: Claims::from_serializable(&claims)?,
            lifetime,
            creation_time,
        })
    }

    async fn sign(&self, claims: &Claims, credential: &SigningCredential) -> AuthResult<String> {
        let mut header = Header::new(credential.algorithm());
        header.kid = credential.kid().map(str::to_owned);

        let token = encode(&header, claims, &credential.encoding_key())
            .map_err(|e| JwtError::Signing(e.to_string()))?;
        Ok(token)
    }
}

fn seconds(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_secs()).unwrap_or(u32::MAX)
}
