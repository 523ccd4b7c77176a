//! In-memory store implementations.
//!
//! Backed by `DashMap`, suitable for single-node deployments and tests.
//! Entries carry an expiry instant; expired entries are invisible to reads
//! and purged by `cleanup_expired`.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::{AuthorizationCodeStore, TokenHandleStore};
use crate::token::claims::AccessToken;
use crate::types::AuthorizationCode;

struct Expiring<T> {
    value: T,
    expires_at: OffsetDateTime,
}

impl<T> Expiring<T> {
    fn is_live(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }
}

/// Insert-only map with per-entry expiry.
struct TransientMap<T> {
    entries: DashMap<String, Expiring<T>>,
}

impl<T: Clone> TransientMap<T> {
    fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn insert(&self, key: &str, value: T, expires_at: OffsetDateTime) -> AuthResult<()> {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(_) => Err(AuthError::storage("Key already in use")),
            Entry::Vacant(slot) => {
                slot.insert(Expiring { value, expires_at });
                Ok(())
            }
        }
    }

    fn get(&self, key: &str) -> Option<T> {
        let now = OffsetDateTime::now_utc();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Some(entry.value.clone());
            }
        }
        // Expired: drop it eagerly
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        None
    }

    fn remove(&self, key: &str) -> Option<T> {
        let now = OffsetDateTime::now_utc();
        self.entries
            .remove(key)
            .map(|(_, entry)| entry)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value)
    }

    fn cleanup_expired(&self) -> u64 {
        let now = OffsetDateTime::now_utc();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        (before.saturating_sub(self.entries.len())) as u64
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Authorization Codes
// =============================================================================

/// In-memory authorization code store.
///
/// Codes expire `lifetime` after their creation time.
pub struct InMemoryAuthorizationCodeStore {
    codes: TransientMap<AuthorizationCode>,
    lifetime: Duration,
}

impl InMemoryAuthorizationCodeStore {
    /// Creates an empty store with the given code lifetime.
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            codes: TransientMap::new(),
            lifetime,
        }
    }

    /// Deletes expired codes, returning how many were removed.
    pub fn cleanup_expired(&self) -> u64 {
        self.codes.cleanup_expired()
    }

    /// Number of stored codes, expired ones included until cleanup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the store holds no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn store(&self, key: &str, code: &AuthorizationCode) -> AuthResult<()> {
        self.codes
            .insert(key, code.clone(), code.creation_time + self.lifetime)
    }

    async fn get(&self, key: &str) -> AuthResult<Option<AuthorizationCode>> {
        Ok(self.codes.get(key))
    }

    async fn remove(&self, key: &str) -> AuthResult<Option<AuthorizationCode>> {
        Ok(self.codes.remove(key))
    }
}

// =============================================================================
// Reference Tokens
// =============================================================================

/// In-memory reference token store.
///
/// Handles expire together with the token they point to.
pub struct InMemoryTokenHandleStore {
    tokens: TransientMap<AccessToken>,
}

impl InMemoryTokenHandleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: TransientMap::new(),
        }
    }

    /// Deletes expired tokens, returning how many were removed.
    pub fn cleanup_expired(&self) -> u64 {
        self.tokens.cleanup_expired()
    }

    /// Number of stored tokens, expired ones included until cleanup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the store holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTokenHandleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenHandleStore for InMemoryTokenHandleStore {
    async fn store(&self, key: &str, token: &AccessToken) -> AuthResult<()> {
        self.tokens.insert(key, token.clone(), token.expires_at())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<AccessToken>> {
        Ok(self.tokens.get(key))
    }

    async fn remove(&self, key: &str) -> AuthResult<Option<AccessToken>> {
        Ok(self.tokens.remove(key))
    }
}
