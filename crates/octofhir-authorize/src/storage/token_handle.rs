//! Reference token storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::token::claims::AccessToken;

/// Storage for access tokens issued by reference.
///
/// The handle handed to the client is the key; the claims stay here.
/// Implementations must be safe under concurrent access.
#[async_trait]
pub trait TokenHandleStore: Send + Sync {
    /// Stores an access token under a freshly generated handle.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the write did not complete, including
    /// when `key` is already taken.
    async fn store(&self, key: &str, token: &AccessToken) -> AuthResult<()>;

    /// Looks up an access token by handle.
    ///
    /// Expired tokens are reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get(&self, key: &str) -> AuthResult<Option<AccessToken>>;

    /// Removes an access token by handle and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn remove(&self, key: &str) -> AuthResult<Option<AccessToken>>;
}
