//! # octofhir-authorize
//!
//! Authorization endpoint response generation for the OctoFHIR server.
//!
//! This crate provides:
//! - Authorization code flow responses backed by a code store
//! - Implicit flow responses with identity and access tokens
//! - Client-secret (HMAC) and certificate signing of identity tokens
//! - Self-contained and reference access tokens
//!
//! ## Overview
//!
//! Request validation and user authentication happen upstream. This crate
//! receives a [`ValidatedAuthorizeRequest`] and an authenticated
//! [`Subject`] and produces an [`AuthorizeResponse`] for the transport
//! layer to turn into a redirect.
//!
//! ## Modules
//!
//! - [`config`] - Issuer, token lifetime, and signing key configuration
//! - [`response`] - Response values and the response generator
//! - [`token`] - Claims, signing credentials, and the token issuer
//! - [`settings`] - Provider signing certificate source
//! - [`handle`] - Random opaque handles for codes and reference tokens
//! - [`storage`] - Storage traits and in-memory stores
//! - [`types`] - Clients, requests, subjects, and code records

pub mod config;
pub mod error;
pub mod handle;
pub mod response;
pub mod settings;
pub mod storage;
pub mod token;
pub mod types;

pub use config::{AuthorizeConfig, ConfigError};
pub use error::{AuthError, ErrorCategory};
pub use handle::{HandleGenerator, RandomHandleGenerator};
pub use response::{
    AuthorizeResponse, AuthorizeResponseGenerator, CodeFlowResponse, ImplicitFlowResponse,
    IssuedAccessToken,
};
pub use settings::{SettingsProvider, StaticSettings};
pub use storage::{
    AuthorizationCodeStore, InMemoryAuthorizationCodeStore, InMemoryTokenHandleStore,
    TokenHandleStore,
};
pub use token::{
    AccessToken, Claims, JwtError, JwtTokenIssuer, SigningAlgorithm, SigningCertificate,
    SigningCredential, TokenIssuer,
};
pub use types::{
    AccessTokenType, AuthorizationCode, Client, SigningKeyType, Subject,
    ValidatedAuthorizeRequest,
};

/// Type alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use octofhir_authorize::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthorizeConfig, ConfigError};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::handle::{HandleGenerator, RandomHandleGenerator};
    pub use crate::response::{AuthorizeResponse, AuthorizeResponseGenerator};
    pub use crate::settings::{SettingsProvider, StaticSettings};
    pub use crate::storage::{
        AuthorizationCodeStore, InMemoryAuthorizationCodeStore, InMemoryTokenHandleStore,
        TokenHandleStore,
    };
    pub use crate::token::{JwtTokenIssuer, SigningCertificate, TokenIssuer};
    pub use crate::types::{
        AccessTokenType, Client, SigningKeyType, Subject, ValidatedAuthorizeRequest,
    };
}
