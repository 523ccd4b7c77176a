//! Authorization code record.
//!
//! What the code flow stores under the opaque code handed to the client.
//! The redemption stage looks it up, checks client and redirect URI, and
//! turns the embedded tokens into a token response.
//!
//! # Security
//!
//! - The code itself is only a random handle; the record never leaves the server
//! - Codes are single-use; enforcement belongs to the redemption stage
//! - Expiry is the store's responsibility

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::token::claims::{AccessToken, Claims};

/// Authorization code record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Client the code was issued to.
    pub client_id: String,

    /// Always `true` for codes issued by the code flow.
    pub is_openid: bool,

    /// Requested scopes (space-separated).
    pub requested_scopes: String,

    /// When the code was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,

    /// Redirect URI from the authorization request.
    /// Must match the redirect_uri in the token request.
    pub redirect_uri: String,

    /// Identity token claims, signed at redemption.
    pub identity_token: Claims,

    /// Access token minted at authorization time.
    pub access_token: AccessToken,
}
