//! Storage traits for deferred tokens.
//!
//! This module defines storage interfaces for:
//!
//! - Authorization codes (code flow)
//! - Reference access tokens (opaque handles)
//!
//! Both stores are insert-only under freshly generated keys. In-memory
//! implementations live in [`memory`].

pub mod authorization_code;
pub mod memory;
pub mod token_handle;

pub use authorization_code::AuthorizationCodeStore;
pub use memory::{InMemoryAuthorizationCodeStore, InMemoryTokenHandleStore};
pub use token_handle::TokenHandleStore;
