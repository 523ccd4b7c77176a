//! Opaque handle generation.
//!
//! Authorization codes and reference access tokens are looked up by a
//! random handle. Handles carry at least 128 bits of entropy from the
//! operating system's CSPRNG and are hex encoded.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::config::{HandleConfig, MAX_HANDLE_ENTROPY_BYTES, MIN_HANDLE_ENTROPY_BYTES};

/// Produces fresh, unpredictable lookup keys.
pub trait HandleGenerator: Send + Sync {
    /// Returns a new handle. Never returns the same value twice in practice.
    fn generate(&self) -> String;
}

/// Handle generator backed by [`OsRng`].
#[derive(Debug, Clone, Copy)]
pub struct RandomHandleGenerator {
    entropy_bytes: usize,
}

impl RandomHandleGenerator {
    /// Creates a generator emitting `entropy_bytes` random bytes per handle.
    ///
    /// The size is clamped to 16..=64 bytes.
    #[must_use]
    pub fn new(entropy_bytes: usize) -> Self {
        Self {
            entropy_bytes: entropy_bytes.clamp(MIN_HANDLE_ENTROPY_BYTES, MAX_HANDLE_ENTROPY_BYTES),
        }
    }

    /// Creates a generator from configuration.
    #[must_use]
    pub fn from_config(config: &HandleConfig) -> Self {
        Self::new(config.entropy_bytes)
    }
}

impl Default for RandomHandleGenerator {
    fn default() -> Self {
        Self::new(MIN_HANDLE_ENTROPY_BYTES)
    }
}

impl HandleGenerator for RandomHandleGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.entropy_bytes];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_handle_is_32_hex_chars() {
        let handle = RandomHandleGenerator::default().generate();
        assert_eq!(handle.len(), 32);
        assert!(
            handle
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_handles_are_unique() {
        let generator = RandomHandleGenerator::default();
        let handles: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(handles.len(), 1000);
    }

    #[test]
    fn test_entropy_floor() {
        let handle = RandomHandleGenerator::new(4).generate();
        assert_eq!(handle.len(), 32);
    }

    #[test]
    fn test_entropy_ceiling() {
        let handle = RandomHandleGenerator::new(usize::MAX).generate();
        assert_eq!(handle.len(), 128);
    }

    #[test]
    fn test_from_config() {
        let generator = RandomHandleGenerator::from_config(&HandleConfig { entropy_bytes: 32 });
        assert_eq!(generator.generate().len(), 64);
    }
}
