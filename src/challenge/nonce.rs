// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Random source for challenge nonces.

use ring::rand::{SecureRandom, SystemRandom};

/// The random source could not produce bytes.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("random source unavailable")]
pub struct RandomSourceError;

/// Fills buffers with cryptographically secure random bytes.
pub trait NonceSource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone)]
pub struct SystemNonceSource {
    rng: SystemRandom,
}

impl SystemNonceSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemNonceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for SystemNonceSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
        self.rng.fill(dest).map_err(|_| RandomSourceError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_source_fills_distinct_buffers() {
        let source = SystemNonceSource::new();
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        source.fill(&mut a).unwrap();
        source.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
