//! Token minting and signing.
//!
//! This module provides:
//!
//! - Opaque and typed claim sets
//! - The provider signing certificate
//! - Signing credential resolution (client secret vs. certificate)
//! - The token issuer seam and its JWT implementation

pub mod claims;
pub mod credential;
pub mod issuer;
pub mod jwt;

pub use claims::{AccessToken, AccessTokenClaims, AccessTokenClaimsBuilder, Claims, IdentityTokenClaims};
pub use credential::{SharedSecret, SigningCredential, SigningCredentialResolver};
pub use issuer::{JwtTokenIssuer, TokenIssuer};
pub use jwt::{JwtError, SigningAlgorithm, SigningCertificate};
