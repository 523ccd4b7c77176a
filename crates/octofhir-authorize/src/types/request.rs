//! Inputs to response generation: the validated request and its subject.

use std::sync::Arc;

use time::OffsetDateTime;

use super::client::Client;

/// An authorization request that has already passed validation.
///
/// Redirect URI, client and scope legality are checked upstream; this type
/// only carries the outcome.
#[derive(Debug, Clone)]
pub struct ValidatedAuthorizeRequest {
    /// Client identifier from the request.
    pub client_id: String,

    /// The client's registration.
    pub client: Arc<Client>,

    /// Redirect URI the response will be delivered to.
    pub redirect_uri: String,

    /// Scopes in the order the client requested them.
    pub requested_scopes: Vec<String>,

    /// Scopes actually granted (a subset of `requested_scopes`).
    pub granted_scopes: Vec<String>,

    /// Opaque client state, echoed back untouched.
    pub state: Option<String>,

    /// OpenID Connect nonce.
    pub nonce: Option<String>,

    /// `response_type` asked for an identity token.
    pub is_openid_request: bool,

    /// `response_type` asked for an access token.
    pub is_resource_request: bool,
}

impl ValidatedAuthorizeRequest {
    /// Requested scopes as a space separated string.
    #[must_use]
    pub fn requested_scope_string(&self) -> String {
        self.requested_scopes.join(" ")
    }

    /// Granted scopes as a space separated string.
    #[must_use]
    pub fn granted_scope_string(&self) -> String {
        self.granted_scopes.join(" ")
    }
}

/// The authenticated end-user the tokens are issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Stable subject identifier (`sub` claim).
    pub subject_id: String,

    /// When the user authenticated.
    pub authentication_time: Option<OffsetDateTime>,

    /// Authentication methods (`amr` claim), e.g. `pwd`, `otp`.
    pub authentication_methods: Vec<String>,
}

impl Subject {
    /// Creates a subject with no authentication details.
    #[must_use]
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            authentication_time: None,
            authentication_methods: Vec::new(),
        }
    }
}
