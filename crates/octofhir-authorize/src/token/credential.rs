//! Signing credential resolution.
//!
//! A token is signed either with a key derived from the client's shared
//! secret (HMAC) or with the provider's signing certificate. Which one a
//! client gets for its identity tokens is part of its registration.
//! Self-contained access tokens are always signed with the certificate.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::AuthResult;
use crate::error::AuthError;
use crate::settings::SettingsProvider;
use crate::token::jwt::SigningCertificate;
use crate::types::{Client, SigningKeyType};

/// A client's shared secret used as an HMAC key.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wraps a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

/// Key material for producing a signed compact token.
#[derive(Debug, Clone)]
pub enum SigningCredential {
    /// HMAC-SHA256 over the client's secret.
    ClientSecret(SharedSecret),
    /// The provider's asymmetric signing certificate.
    Certificate(Arc<SigningCertificate>),
}

impl SigningCredential {
    /// JWS algorithm for this credential.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::ClientSecret(_) => Algorithm::HS256,
            Self::Certificate(cert) => cert.algorithm.to_jwt_algorithm(),
        }
    }

    /// Key ID for the JWT header. Only certificates carry one.
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        match self {
            Self::ClientSecret(_) => None,
            Self::Certificate(cert) => Some(&cert.kid),
        }
    }

    /// Returns `true` for the certificate variant.
    #[must_use]
    pub fn is_certificate(&self) -> bool {
        matches!(self, Self::Certificate(_))
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        match self {
            Self::ClientSecret(secret) => EncodingKey::from_secret(secret.as_bytes()),
            Self::Certificate(cert) => cert.encoding_key().clone(),
        }
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        match self {
            Self::ClientSecret(secret) => DecodingKey::from_secret(secret.as_bytes()),
            Self::Certificate(cert) => cert.decoding_key().clone(),
        }
    }
}

/// Picks the signing credential a client is entitled to.
#[derive(Clone)]
pub struct SigningCredentialResolver {
    settings: Arc<dyn SettingsProvider>,
}

impl SigningCredentialResolver {
    /// Creates a resolver reading the certificate from `settings`.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self { settings }
    }

    /// Resolves the credential for the client's identity tokens.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the client is set up for
    /// client-secret signing without a secret, or certificate signing is
    /// selected and no certificate is configured.
    pub fn resolve(&self, client: &Client) -> AuthResult<SigningCredential> {
        match client.identity_token_signing_key_type {
            SigningKeyType::ClientSecret => {
                let secret = client
                    .client_secret
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        tracing::warn!(
                            client_id = %client.client_id,
                            "Client secret signing configured without a secret"
                        );
                        AuthError::configuration(format!(
                            "Client '{}' has no secret for identity token signing",
                            client.client_id
                        ))
                    })?;
                Ok(SigningCredential::ClientSecret(SharedSecret::new(secret)))
            }
            SigningKeyType::Certificate => self.provider_credential(),
        }
    }

    /// Returns the provider's certificate credential, whatever the client's
    /// identity token settings are.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if no certificate is configured.
    pub fn provider_credential(&self) -> AuthResult<SigningCredential> {
        let certificate = self.settings.signing_certificate().inspect_err(|e| {
            tracing::warn!(error = %e, "Signing certificate unavailable");
        })?;
        Ok(SigningCredential::Certificate(certificate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StaticSettings;

    fn resolver_with_certificate() -> (SigningCredentialResolver, String) {
        let cert = SigningCertificate::generate_ec().unwrap();
        let kid = cert.kid.clone();
        (
            SigningCredentialResolver::new(Arc::new(StaticSettings::new(cert))),
            kid,
        )
    }

    fn client_secret_client() -> Client {
        let mut client = Client::new("hmac-client", "HMAC Client");
        client.identity_token_signing_key_type = SigningKeyType::ClientSecret;
        client.client_secret = Some("super-secret-value".to_string());
        client
    }

    #[test]
    fn test_client_secret_key_type_resolves_symmetric() {
        let (resolver, _) = resolver_with_certificate();
        let credential = resolver.resolve(&client_secret_client()).unwrap();

        assert!(matches!(credential, SigningCredential::ClientSecret(_)));
        assert_eq!(credential.algorithm(), Algorithm::HS256);
        assert!(credential.kid().is_none());
    }

    #[test]
    fn test_certificate_key_type_resolves_asymmetric() {
        let (resolver, kid) = resolver_with_certificate();
        let credential = resolver.resolve(&Client::new("rsa-client", "RSA")).unwrap();

        assert!(credential.is_certificate());
        assert_eq!(credential.algorithm(), Algorithm::ES384);
        assert_eq!(credential.kid(), Some(kid.as_str()));
    }

    #[test]
    fn test_provider_credential_ignores_client_settings() {
        let (resolver, _) = resolver_with_certificate();
        assert!(resolver.provider_credential().unwrap().is_certificate());
    }

    #[test]
    fn test_missing_certificate_is_configuration_error() {
        let resolver =
            SigningCredentialResolver::new(Arc::new(StaticSettings::without_certificate()));

        let err = resolver.resolve(&Client::new("c", "C")).unwrap_err();
        assert!(err.is_configuration_error());

        let err = resolver.provider_credential().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_missing_certificate_does_not_affect_client_secret_path() {
        let resolver =
            SigningCredentialResolver::new(Arc::new(StaticSettings::without_certificate()));
        assert!(resolver.resolve(&client_secret_client()).is_ok());
    }

    #[test]
    fn test_client_secret_without_secret_is_configuration_error() {
        let (resolver, _) = resolver_with_certificate();
        let mut client = client_secret_client();
        client.client_secret = None;

        let err = resolver.resolve(&client).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("hmac-client"));
    }

    #[test]
    fn test_shared_secret_debug_is_redacted() {
        let secret = SharedSecret::new("super-secret-value");
        assert_eq!(format!("{:?}", secret), "SharedSecret(***)");
    }
}
