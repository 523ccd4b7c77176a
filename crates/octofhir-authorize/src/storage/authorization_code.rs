//! Authorization code storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::AuthorizationCode;

/// Storage for issued authorization codes.
///
/// Implementations must be safe under concurrent access.
#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    /// Stores a code record under a freshly generated key.
    ///
    /// # Arguments
    ///
    /// * `key` - The opaque code returned to the client
    /// * `code` - The record to store
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the write did not complete, including
    /// when `key` is already taken. Existing entries are never overwritten.
    async fn store(&self, key: &str, code: &AuthorizationCode) -> AuthResult<()>;

    /// Looks up a code record.
    ///
    /// # Returns
    ///
    /// Returns `Some(code)` if found and not expired, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get(&self, key: &str) -> AuthResult<Option<AuthorizationCode>>;

    /// Removes a code record and returns it.
    ///
    /// The redemption stage calls this to make a code single-use.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn remove(&self, key: &str) -> AuthResult<Option<AuthorizationCode>>;
}
