//! Provider settings consumed during response generation.
//!
//! The only setting the generator needs is the provider's currently active
//! signing certificate.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::AuthResult;
use crate::config::{ConfigError, SigningConfig};
use crate::error::AuthError;
use crate::token::jwt::{SigningAlgorithm, SigningCertificate};

/// Source of the provider's signing certificate.
pub trait SettingsProvider: Send + Sync {
    /// Returns the active signing certificate.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if no certificate is configured.
    fn signing_certificate(&self) -> AuthResult<Arc<SigningCertificate>>;
}

/// Settings held in memory.
///
/// The certificate sits behind an atomic pointer so it can be replaced at
/// runtime (key rollover) without blocking concurrent signers.
#[derive(Default)]
pub struct StaticSettings {
    certificate: ArcSwapOption<SigningCertificate>,
}

impl StaticSettings {
    /// Creates settings with a signing certificate.
    #[must_use]
    pub fn new(certificate: SigningCertificate) -> Self {
        Self {
            certificate: ArcSwapOption::from_pointee(certificate),
        }
    }

    /// Creates settings without a signing certificate.
    #[must_use]
    pub fn without_certificate() -> Self {
        Self::default()
    }

    /// Builds settings from the signing configuration.
    ///
    /// Loads the PEM key pair when both paths are configured; otherwise the
    /// provider runs without a certificate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the algorithm is unsupported or
    /// the key files cannot be loaded.
    pub fn from_config(config: &SigningConfig) -> Result<Self, ConfigError> {
        let (Some(private_key_path), Some(public_key_path)) =
            (&config.private_key_path, &config.public_key_path)
        else {
            tracing::info!("No signing key configured, certificate signing is unavailable");
            return Ok(Self::without_certificate());
        };

        let algorithm: SigningAlgorithm = config
            .algorithm
            .parse()
            .map_err(|e: crate::token::jwt::JwtError| ConfigError::InvalidValue(e.to_string()))?;
        let kid = config
            .key_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let certificate =
            SigningCertificate::from_pem_files(kid, algorithm, private_key_path, public_key_path)
                .map_err(|e| ConfigError::InvalidValue(format!("signing key: {}", e)))?;

        tracing::info!(kid = %certificate.kid, algorithm = %algorithm, "Loaded signing certificate");
        Ok(Self::new(certificate))
    }

    /// Replaces the active signing certificate.
    ///
    /// Signing operations already holding the previous certificate finish
    /// with it.
    pub fn replace_certificate(&self, certificate: SigningCertificate) {
        tracing::info!(kid = %certificate.kid, "Replacing signing certificate");
        self.certificate.store(Some(Arc::new(certificate)));
    }
}

impl SettingsProvider for StaticSettings {
    fn signing_certificate(&self) -> AuthResult<Arc<SigningCertificate>> {
        self.certificate
            .load_full()
            .ok_or_else(|| AuthError::configuration("No signing certificate configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};

    #[test]
    fn test_without_certificate_is_configuration_error() {
        let settings = StaticSettings::without_certificate();
        let err = settings.signing_certificate().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_returns_configured_certificate() {
        let cert = SigningCertificate::generate_ec().unwrap();
        let kid = cert.kid.clone();
        let settings = StaticSettings::new(cert);

        assert_eq!(settings.signing_certificate().unwrap().kid, kid);
    }

    #[test]
    fn test_replace_certificate() {
        let settings = StaticSettings::without_certificate();
        let cert = SigningCertificate::generate_ec().unwrap();
        let kid = cert.kid.clone();

        settings.replace_certificate(cert);
        assert_eq!(settings.signing_certificate().unwrap().kid, kid);
    }

    #[test]
    fn test_from_config_without_key_paths() {
        let settings = StaticSettings::from_config(&SigningConfig::default()).unwrap();
        assert!(settings.signing_certificate().is_err());
    }

    #[test]
    fn test_from_config_loads_pem_files() {
        let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        let private_pem = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let private_path = dir.path().join("signing.key.pem");
        let public_path = dir.path().join("signing.pub.pem");
        std::fs::write(&private_path, private_pem.as_bytes()).unwrap();
        std::fs::write(&public_path, public_pem.as_bytes()).unwrap();

        let config = SigningConfig {
            algorithm: "RS256".to_string(),
            key_id: Some("rollover-1".to_string()),
            private_key_path: Some(private_path),
            public_key_path: Some(public_path),
        };

        let settings = StaticSettings::from_config(&config).unwrap();
        let cert = settings.signing_certificate().unwrap();
        assert_eq!(cert.kid, "rollover-1");
        assert_eq!(cert.algorithm, SigningAlgorithm::RS256);
    }

    #[test]
    fn test_from_config_bad_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let private_path = dir.path().join("signing.key.pem");
        let public_path = dir.path().join("signing.pub.pem");
        std::fs::write(&private_path, "garbage").unwrap();
        std::fs::write(&public_path, "garbage").unwrap();

        let config = SigningConfig {
            private_key_path: Some(private_path),
            public_key_path: Some(public_path),
            ..SigningConfig::default()
        };

        let err = StaticSettings::from_config(&config).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
