// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge registry: issuance, single-use consumption and expiry.

use std::sync::Arc;
use std::time::Duration;

use alloy::hex;

use super::clock::{Clock, SystemClock};
use super::nonce::{NonceSource, RandomSourceError, SystemNonceSource};
use super::record::{ChallengeRecord, NONCE_LEN};
use super::store::{ChallengeStore, InMemoryChallengeStore};

/// Fresh nonces drawn before giving up on a colliding challenge text.
const MAX_INSERT_ATTEMPTS: usize = 8;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChallengeError {
    /// No record for this text: never issued, or already consumed.
    #[error("challenge not found")]
    NotFound,
    /// The record outlived its TTL. It has been removed.
    #[error("challenge expired")]
    Expired,
    /// The random source failed. Not recoverable.
    #[error("failed to generate challenge nonce: {0}")]
    RandomSource(#[from] RandomSourceError),
    /// Every attempt produced a challenge text that was already stored.
    #[error("could not allocate a unique challenge")]
    Exhausted,
}

/// Single source of truth for outstanding challenges.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct ChallengeRegistry {
    store: Arc<dyn ChallengeStore>,
    clock: Arc<dyn Clock>,
    nonces: Arc<dyn NonceSource>,
    ttl: Duration,
}

impl ChallengeRegistry {
    /// In-memory registry on the system clock and OS random source.
    pub fn new(ttl: Duration) -> Self {
        Self::with_parts(
            Arc::new(InMemoryChallengeStore::new()),
            Arc::new(SystemClock),
            Arc::new(SystemNonceSource::new()),
            ttl,
        )
    }

    pub fn with_parts(
        store: Arc<dyn ChallengeStore>,
        clock: Arc<dyn Clock>,
        nonces: Arc<dyn NonceSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            nonces,
            ttl,
        }
    }

    /// Swap the clock, keeping everything else.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored records, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Issue a new challenge for `subject_address` and store it.
    pub fn create(&self, subject_address: &str) -> Result<ChallengeRecord, ChallengeError> {
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let mut nonce = [0u8; NONCE_LEN];
            self.nonces.fill(&mut nonce)?;

            let record = ChallengeRecord::new(subject_address, hex::encode(nonce), self.clock.now());
            if self.store.insert_if_vacant(record.clone()) {
                return Ok(record);
            }
            tracing::warn!(action = "challenge_collision", "Challenge text collision, drawing a new nonce");
        }
        Err(ChallengeError::Exhausted)
    }

    /// Remove and return the record for `challenge_text`.
    ///
    /// The record is gone after this call whatever the outcome, so an
    /// expired challenge stays unusable and a consumed one reads as
    /// [`ChallengeError::NotFound`].
    pub fn consume(&self, challenge_text: &str) -> Result<ChallengeRecord, ChallengeError> {
        let record = self
            .store
            .take(challenge_text)
            .ok_or(ChallengeError::NotFound)?;

        if !record.is_live(self.clock.now(), self.ttl) {
            return Err(ChallengeError::Expired);
        }
        Ok(record)
    }

    /// Drop every record past its TTL. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.store.retain_live(&|record| record.is_live(now, ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::clock::ManualClock;
    use crate::challenge::record::CHALLENGE_PREFIX;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manual_registry(ttl: Duration) -> (ChallengeRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let registry = ChallengeRegistry::new(ttl).with_clock(clock.clone());
        (registry, clock)
    }

    struct FailingSource;

    impl NonceSource for FailingSource {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), RandomSourceError> {
            Err(RandomSourceError)
        }
    }

    /// Always yields the same bytes, forcing text collisions.
    struct StuckSource(AtomicUsize);

    impl NonceSource for StuckSource {
        fn fill(&self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            dest.fill(0xab);
            Ok(())
        }
    }

    #[test]
    fn create_renders_hex_nonce_into_template() {
        let registry = ChallengeRegistry::new(Duration::from_secs(60));
        let record = registry.create("0xABC").unwrap();

        assert_eq!(record.subject_address, "0xABC");
        assert_eq!(record.nonce.len(), NONCE_LEN * 2);
        assert!(record.nonce.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            record.challenge_text,
            format!("{CHALLENGE_PREFIX}0xABC: {}", record.nonce)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn challenges_are_unique() {
        let registry = ChallengeRegistry::new(Duration::from_secs(60));
        let texts: HashSet<_> = (0..500)
            .map(|_| registry.create("0xABC").unwrap().challenge_text)
            .collect();
        assert_eq!(texts.len(), 500);
    }

    #[test]
    fn consume_returns_record_once() {
        let registry = ChallengeRegistry::new(Duration::from_secs(60));
        let record = registry.create("0xABC").unwrap();

        assert_eq!(registry.consume(&record.challenge_text), Ok(record.clone()));
        assert_eq!(
            registry.consume(&record.challenge_text),
            Err(ChallengeError::NotFound)
        );
    }

    #[test]
    fn unknown_text_is_not_found() {
        let registry = ChallengeRegistry::new(Duration::from_secs(60));
        assert_eq!(
            registry.consume("not a real challenge"),
            Err(ChallengeError::NotFound)
        );
    }

    #[test]
    fn tampered_text_is_not_found() {
        let registry = ChallengeRegistry::new(Duration::from_secs(60));
        let record = registry.create("0xABC").unwrap();
        let tampered = record.challenge_text.replace("0xABC", "0xDEF");
        assert_eq!(registry.consume(&tampered), Err(ChallengeError::NotFound));
        assert!(registry.consume(&record.challenge_text).is_ok());
    }

    #[test]
    fn expiry_boundary() {
        let ttl = Duration::from_secs(60);
        let (registry, clock) = manual_registry(ttl);

        let fresh = registry.create("0xABC").unwrap();
        clock.advance(ttl - Duration::from_millis(1));
        assert!(registry.consume(&fresh.challenge_text).is_ok());

        let stale = registry.create("0xABC").unwrap();
        clock.advance(ttl + Duration::from_millis(1));
        assert_eq!(
            registry.consume(&stale.challenge_text),
            Err(ChallengeError::Expired)
        );
    }

    #[test]
    fn expired_record_is_deleted_on_detection() {
        let ttl = Duration::from_secs(1);
        let (registry, clock) = manual_registry(ttl);
        let record = registry.create("0xABC").unwrap();

        clock.advance(Duration::from_secs(2));
        assert_eq!(
            registry.consume(&record.challenge_text),
            Err(ChallengeError::Expired)
        );
        assert!(registry.is_empty());

        // Winding the clock back does not resurrect it.
        clock.set(record.issued_at);
        assert_eq!(
            registry.consume(&record.challenge_text),
            Err(ChallengeError::NotFound)
        );
    }

    #[test]
    fn random_source_failure_is_reported() {
        let registry = ChallengeRegistry::with_parts(
            Arc::new(InMemoryChallengeStore::new()),
            Arc::new(SystemClock),
            Arc::new(FailingSource),
            Duration::from_secs(60),
        );
        assert_eq!(
            registry.create("0xABC"),
            Err(ChallengeError::RandomSource(RandomSourceError))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn colliding_texts_never_overwrite() {
        let source = Arc::new(StuckSource(AtomicUsize::new(0)));
        let registry = ChallengeRegistry::with_parts(
            Arc::new(InMemoryChallengeStore::new()),
            Arc::new(SystemClock),
            source.clone(),
            Duration::from_secs(60),
        );

        let first = registry.create("0xABC").unwrap();
        assert_eq!(registry.create("0xABC"), Err(ChallengeError::Exhausted));
        assert_eq!(source.0.load(Ordering::SeqCst), 1 + MAX_INSERT_ATTEMPTS);

        // The original record is untouched.
        assert_eq!(registry.consume(&first.challenge_text), Ok(first));
    }

    #[test]
    fn purge_drops_only_expired() {
        let ttl = Duration::from_secs(10);
        let (registry, clock) = manual_registry(ttl);

        registry.create("0xOLD1").unwrap();
        registry.create("0xOLD2").unwrap();
        clock.advance(Duration::from_secs(8));
        let young = registry.create("0xYOUNG").unwrap();
        clock.advance(Duration::from_secs(5));

        assert_eq!(registry.purge_expired(), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.consume(&young.challenge_text).is_ok());
    }
}
