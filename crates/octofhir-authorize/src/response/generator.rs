//! Authorization response generator.
//!
//! Turns a validated authorization request and its authenticated subject
//! into the response of either the authorization code flow or the implicit
//! flow.
//!
//! # Usage
//!
//! ```ignore
//! use octofhir_authorize::response::AuthorizeResponseGenerator;
//!
//! let generator = AuthorizeResponseGenerator::new(
//!     token_issuer,
//!     authorization_codes,
//!     token_handles,
//!     settings,
//!     handles,
//! );
//!
//! let response = generator.create_code_flow_response(&request, &subject).await?;
//! ```
//!
//! # Security
//!
//! - A code is returned only after it has been durably stored
//! - Self-contained access tokens are always signed with the provider certificate
//! - Tokens and handles are never logged

use std::sync::Arc;

use time::OffsetDateTime;

use crate::AuthResult;
use crate::handle::HandleGenerator;
use crate::response::authorize::{
    AuthorizeResponse, CodeFlowResponse, ImplicitFlowResponse, IssuedAccessToken,
};
use crate::settings::SettingsProvider;
use crate::storage::{AuthorizationCodeStore, TokenHandleStore};
use crate::token::credential::SigningCredentialResolver;
use crate::token::issuer::TokenIssuer;
use crate::types::{AccessTokenType, AuthorizationCode, Subject, ValidatedAuthorizeRequest};

/// Builds authorization endpoint responses.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct AuthorizeResponseGenerator {
    /// Mints and signs tokens.
    token_issuer: Arc<dyn TokenIssuer>,

    /// Storage for authorization codes.
    authorization_codes: Arc<dyn AuthorizationCodeStore>,

    /// Storage for reference access tokens.
    token_handles: Arc<dyn TokenHandleStore>,

    /// Picks client-secret or certificate credentials.
    credentials: SigningCredentialResolver,

    /// Source of codes and reference token handles.
    handles: Arc<dyn HandleGenerator>,
}

impl AuthorizeResponseGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `token_issuer` - Mints claims and signs compact tokens
    /// * `authorization_codes` - Storage for authorization codes
    /// * `token_handles` - Storage for reference access tokens
    /// * `settings` - Source of the provider signing certificate
    /// * `handles` - Random handle generator
    #[must_use]
    pub fn new(
        token_issuer: Arc<dyn TokenIssuer>,
        authorization_codes: Arc<dyn AuthorizationCodeStore>,
        token_handles: Arc<dyn TokenHandleStore>,
        settings: Arc<dyn SettingsProvider>,
        handles: Arc<dyn HandleGenerator>,
    ) -> Self {
        Self {
            token_issuer,
            authorization_codes,
            token_handles,
            credentials: SigningCredentialResolver::new(settings),
            handles,
        }
    }

    /// Creates an authorization code flow response.
    ///
    /// Mints both an identity token and an access token, whatever the
    /// request's response type, and stores them under a fresh code for
    /// redemption at the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if token minting fails or the code cannot be stored.
    /// In that case no code is handed out.
    pub async fn create_code_flow_response(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<AuthorizeResponse> {
        let identity_token = self
            .token_issuer
            .create_identity_token_claims(request, subject)
            .await?;
        let access_token = self
            .token_issuer
            .create_access_token(request, subject)
            .await?;

        let code = AuthorizationCode {
            client_id: request.client_id.clone(),
            is_openid: true,
            requested_scopes: request.requested_scope_string(),
            creation_time: OffsetDateTime::now_utc(),
            redirect_uri: request.redirect_uri.clone(),
            identity_token,
            access_token,
        };

        let id = self.handles.generate();
        self.authorization_codes
            .store(&id, &code)
            .await
            .inspect_err(|e| {
                tracing::warn!(client_id = %request.client_id, error = %e, "Failed to store authorization code");
            })?;

        tracing::debug!(client_id = %request.client_id, "Issued authorization code");

        Ok(AuthorizeResponse::Code(CodeFlowResponse {
            redirect_uri: request.redirect_uri.clone(),
            code: id,
            state: request.state.clone(),
        }))
    }

    /// Creates an implicit flow response.
    ///
    /// Issues an identity token if the request is an OpenID request and an
    /// access token if it is a resource request. Both, one, or neither may
    /// be present.
    ///
    /// # Errors
    ///
    /// Returns an error if minting, signing, or storing a reference token
    /// fails. Nothing is returned in that case, though a reference token
    /// already stored by the other branch stays stored.
    pub async fn create_implicit_flow_response(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<AuthorizeResponse> {
        let (identity_token, access_token) = tokio::try_join!(
            self.implicit_identity_token(request, subject),
            self.implicit_access_token(request, subject),
        )?;

        Ok(AuthorizeResponse::Implicit(ImplicitFlowResponse {
            redirect_uri: request.redirect_uri.clone(),
            access_token,
            identity_token,
            scope: request.granted_scope_string(),
            state: request.state.clone(),
        }))
    }

    async fn implicit_identity_token(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<Option<String>> {
        if !request.is_openid_request {
            return Ok(None);
        }

        let claims = self
            .token_issuer
            .create_identity_token_claims(request, subject)
            .await?;
        let credential = self.credentials.resolve(&request.client)?;
        let jwt = self.token_issuer.sign(&claims, &credential).await?;

        tracing::debug!(
            client_id = %request.client_id,
            key_type = %request.client.identity_token_signing_key_type,
            "Issued identity token"
        );
        Ok(Some(jwt))
    }

    async fn implicit_access_token(
        &self,
        request: &ValidatedAuthorizeRequest,
        subject: &Subject,
    ) -> AuthResult<Option<IssuedAccessToken>> {
        if !request.is_resource_request {
            return Ok(None);
        }

        let access_token = self
            .token_issuer
            .create_access_token(request, subject)
            .await?;
        let lifetime = access_token.lifetime;

        let value = match request.client.access_token_type {
            AccessTokenType::SelfContained => {
                // Never the client secret, regardless of identity token settings
                let credential = self.credentials.provider_credential()?;
                self.token_issuer
                    .sign(&access_token.claims, &credential)
                    .await?
            }
            AccessTokenType::Reference => {
                let handle = self.handles.generate();
                self.token_handles
                    .store(&handle, &access_token)
                    .await
                    .inspect_err(|e| {
                        tracing::warn!(client_id = %request.client_id, error = %e, "Failed to store reference token");
                    })?;
                handle
            }
        };

        tracing::debug!(
            client_id = %request.client_id,
            token_type = %request.client.access_token_type,
            lifetime,
            "Issued access token"
        );
        Ok(Some(IssuedAccessToken { value, lifetime }))
    }
}
