//! Provider signing certificates and JWT-level errors.
//!
//! The provider signs self-contained access tokens, and identity tokens for
//! clients that are not configured for client-secret signing, with an
//! asymmetric key. Supported algorithms:
//!
//! - **RS256**: RSA with SHA-256 (widely compatible)
//! - **RS384**: RSA with SHA-384
//! - **ES384**: ECDSA with P-384 curve (smaller keys)
//!
//! ## Example
//!
//! ```ignore
//! use octofhir_authorize::token::jwt::{SigningAlgorithm, SigningCertificate};
//!
//! // Load from PEM files produced by the deployment
//! let certificate = SigningCertificate::from_pem_files(
//!     "2024-signing",
//!     SigningAlgorithm::RS256,
//!     "/etc/octofhir/signing.key.pem",
//!     "/etc/octofhir/signing.pub.pem",
//! )?;
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use p384::SecretKey as EcSecretKey;
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};

// ============================================================================
// Error Types
// ============================================================================

/// Failures at the JWS layer: signing, parsing, validation and key material.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// A claim set could not be signed.
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// A compact token could not be parsed.
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// `exp` is in the past.
    #[error("Token expired")]
    Expired,

    /// The signature does not match the verification key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Claims are missing, mistyped, or rejected by validation.
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    /// Key material could not be generated, read or parsed.
    #[error("Invalid key material: {0}")]
    Key(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => Self::InvalidClaims(err.to_string()),
            ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidKeyFormat => Self::Key(err.to_string()),
            _ => Self::Malformed(err.to_string()),
        }
    }
}

// ============================================================================
// Signing Algorithm
// ============================================================================

/// Algorithms the provider certificate may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    RS256,
    RS384,
    ES384,
}

impl SigningAlgorithm {
    const SUPPORTED: [Self; 3] = [Self::RS256, Self::RS384, Self::ES384];

    /// The `jsonwebtoken` equivalent.
    #[must_use]
    pub fn to_jwt_algorithm(self) -> Algorithm {
        match self {
            Self::RS256 => Algorithm::RS256,
            Self::RS384 => Algorithm::RS384,
            Self::ES384 => Algorithm::ES384,
        }
    }

    /// Header name of the algorithm (`alg`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::ES384 => "ES384",
        }
    }

    /// RSA keys for RS*, P-384 keys otherwise.
    #[must_use]
    pub fn is_rsa(self) -> bool {
        !matches!(self, Self::ES384)
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JwtError::Key(format!("unsupported signing algorithm '{s}'")))
    }
}

// ============================================================================
// Signing Certificate
// ============================================================================

/// The provider's asymmetric signing key.
pub struct SigningCertificate {
    /// Key ID, emitted as the JWT `kid` header.
    pub kid: String,

    /// Signing algorithm.
    pub algorithm: SigningAlgorithm,

    /// Private key for signing.
    encoding_key: EncodingKey,

    /// Public key for verification.
    decoding_key: DecodingKey,
}

impl fmt::Debug for SigningCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCertificate")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl SigningCertificate {
    /// Generates a new RSA key pair (2048 bits).
    ///
    /// # Errors
    /// Returns an error if key generation fails or algorithm is not RSA-based.
    pub fn generate_rsa(algorithm: SigningAlgorithm) -> Result<Self, JwtError> {
        if !algorithm.is_rsa() {
            return Err(JwtError::Key(format!(
                "Algorithm {} is not RSA-based",
                algorithm
            )));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, 2048)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| JwtError::Key(e.to_string()))?;
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        Self::from_pem(
            uuid::Uuid::new_v4().to_string(),
            algorithm,
            &private_pem,
            &public_pem,
        )
    }

    /// Generates a new EC key pair on the P-384 curve.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate_ec() -> Result<Self, JwtError> {
        let secret_key = EcSecretKey::random(&mut OsRng);

        let private_pem = secret_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| JwtError::Key(e.to_string()))?;
        let public_pem = secret_key
            .public_key()
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        Self::from_pem(
            uuid::Uuid::new_v4().to_string(),
            SigningAlgorithm::ES384,
            &private_pem,
            &public_pem,
        )
    }

    /// Loads a key pair from PEM strings.
    ///
    /// # Arguments
    /// * `kid` - Key ID
    /// * `algorithm` - Signing algorithm
    /// * `private_pem` - PEM-encoded private key
    /// * `public_pem` - PEM-encoded public key
    ///
    /// # Errors
    /// Returns an error if the PEM data is invalid.
    pub fn from_pem(
        kid: impl Into<String>,
        algorithm: SigningAlgorithm,
        private_pem: &str,
        public_pem: &str,
    ) -> Result<Self, JwtError> {
        let (encoding_key, decoding_key) = if algorithm.is_rsa() {
            (
                EncodingKey::from_rsa_pem(private_pem.as_bytes())
                    .map_err(|e| JwtError::Key(e.to_string()))?,
                DecodingKey::from_rsa_pem(public_pem.as_bytes())
                    .map_err(|e| JwtError::Key(e.to_string()))?,
            )
        } else {
            (
                EncodingKey::from_ec_pem(private_pem.as_bytes())
                    .map_err(|e| JwtError::Key(e.to_string()))?,
                DecodingKey::from_ec_pem(public_pem.as_bytes())
                    .map_err(|e| JwtError::Key(e.to_string()))?,
            )
        };

        Ok(Self {
            kid: kid.into(),
            algorithm,
            encoding_key,
            decoding_key,
        })
    }

    /// Loads a key pair from PEM files.
    ///
    /// # Errors
    /// Returns an error if a file cannot be read or holds invalid PEM data.
    pub fn from_pem_files(
        kid: impl Into<String>,
        algorithm: SigningAlgorithm,
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, JwtError> {
        let read = |path: &Path| {
            std::fs::read_to_string(path)
                .map_err(|e| JwtError::Key(format!("{}: {}", path.display(), e)))
        };
        let private_pem = read(private_key_path.as_ref())?;
        let public_pem = read(public_key_path.as_ref())?;

        Self::from_pem(kid, algorithm, &private_pem, &public_pem)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

// ============================================================================
// Tests
// ============================================================================
