//! Authorization endpoint response values.
//!
//! The transport layer renders these into a redirect: query string for the
//! code flow, URL fragment for the implicit flow. Serializing a response
//! yields exactly the OAuth 2.0 parameters to append; the redirect URI
//! itself is not part of the serialized form.
//!
//! # Example
//!
//! ```ignore
//! HTTP/1.1 302 Found
//! Location: https://app.example.com/callback?
//!   code=9f86d081884c7d659a2feaa0c55ad015
//!   &state=abc123xyz
//! ```

use serde::Serialize;

/// Response of the authorization code flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFlowResponse {
    /// Where the response is delivered.
    #[serde(skip)]
    pub redirect_uri: String,

    /// Opaque authorization code.
    pub code: String,

    /// Echoed state parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Response of the implicit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplicitFlowResponse {
    /// Where the response is delivered.
    #[serde(skip)]
    pub redirect_uri: String,

    /// Access token, if one was issued.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<IssuedAccessToken>,

    /// Signed identity token.
    #[serde(rename = "id_token", skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<String>,

    /// Granted scopes (space-separated).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// Echoed state parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// An access token handed out inline, with its lifetime.
///
/// `expires_in` is always emitted next to `access_token`, even when zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedAccessToken {
    /// JWT or reference handle.
    #[serde(rename = "access_token")]
    pub value: String,

    /// Lifetime in seconds.
    #[serde(rename = "expires_in")]
    pub lifetime: u32,
}

/// Response handed back to the protocol layer.
///
/// Exactly one shape per call, picked by the generator operation invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AuthorizeResponse {
    /// Authorization code flow.
    Code(CodeFlowResponse),
    /// Implicit flow.
    Implicit(ImplicitFlowResponse),
}

impl AuthorizeResponse {
    /// Returns the redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        match self {
            Self::Code(r) => &r.redirect_uri,
            Self::Implicit(r) => &r.redirect_uri,
        }
    }

    /// Returns the echoed state.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::Code(r) => r.state.as_deref(),
            Self::Implicit(r) => r.state.as_deref(),
        }
    }

    /// Returns the authorization code (code flow only).
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Code(r) => Some(&r.code),
            Self::Implicit(_) => None,
        }
    }

    /// Returns the access token (implicit flow only).
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Implicit(r) => r.access_token.as_ref().map(|t| t.value.as_str()),
        }
    }

    /// Returns the access token lifetime in seconds, 0 when no access
    /// token was issued.
    #[must_use]
    pub fn access_token_lifetime(&self) -> u32 {
        match self {
            Self::Implicit(ImplicitFlowResponse {
                access_token: Some(token),
                ..
            }) => token.lifetime,
            _ => 0,
        }
    }

    /// Returns the identity token (implicit flow only).
    #[must_use]
    pub fn identity_token(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Implicit(r) => r.identity_token.as_deref(),
        }
    }

    /// Returns the granted scopes (implicit flow only).
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Implicit(r) => Some(&r.scope),
        }
    }

    /// Returns `true` for a code flow response.
    #[must_use]
    pub fn is_code_flow(&self) -> bool {
        matches!(self, Self::Code(_))
    }
}
