//! Domain types for authorization response generation.

pub mod client;
pub mod code;
pub mod request;

pub use client::{AccessTokenType, Client, ClientValidationError, SigningKeyType};
pub use code::AuthorizationCode;
pub use request::{Subject, ValidatedAuthorizeRequest};
