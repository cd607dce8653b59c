// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage backend for outstanding challenges.
//!
//! The in-memory store only serves a single process. Running several
//! instances behind a load balancer requires a shared, TTL-capable store
//! implementing [`ChallengeStore`] with the same atomic `take` semantics,
//! otherwise a challenge could be redeemed once per instance.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::record::ChallengeRecord;

/// Key-value store of challenge records keyed by challenge text.
pub trait ChallengeStore: Send + Sync {
    /// Insert `record` under its challenge text unless the key is taken.
    ///
    /// Returns `false` (and stores nothing) if the key already exists.
    fn insert_if_vacant(&self, record: ChallengeRecord) -> bool;

    /// Remove and return the record stored under `challenge_text`.
    ///
    /// Lookup and removal are a single atomic step: of any number of
    /// concurrent callers with the same key, at most one receives `Some`.
    fn take(&self, challenge_text: &str) -> Option<ChallengeRecord>;

    /// Keep only records `is_live` accepts. Returns how many were removed.
    fn retain_live(&self, is_live: &dyn Fn(&ChallengeRecord) -> bool) -> usize;

    /// Number of stored records, live or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sharded in-memory store. Locks are per shard, so unrelated challenges do
/// not contend on a single lock.
#[derive(Debug, Default)]
pub struct InMemoryChallengeStore {
    records: DashMap<String, ChallengeRecord>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChallengeStore for InMemoryChallengeStore {
    fn insert_if_vacant(&self, record: ChallengeRecord) -> bool {
        match self.records.entry(record.challenge_text.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    fn take(&self, challenge_text: &str) -> Option<ChallengeRecord> {
        self.records.remove(challenge_text).map(|(_, record)| record)
    }

    fn retain_live(&self, is_live: &dyn Fn(&ChallengeRecord) -> bool) -> usize {
        let mut removed = 0;
        self.records.retain(|_, record| {
            let kept = is_live(record);
            if !kept {
                removed += 1;
            }
            kept
        });
        removed
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn record(nonce: &str) -> ChallengeRecord {
        ChallengeRecord::new("0xABC", nonce, Utc::now())
    }

    #[test]
    fn insert_refuses_existing_key() {
        let store = InMemoryChallengeStore::new();
        assert!(store.insert_if_vacant(record("01")));
        assert!(!store.insert_if_vacant(record("01")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn take_removes_exactly_once() {
        let store = InMemoryChallengeStore::new();
        let rec = record("02");
        store.insert_if_vacant(rec.clone());

        assert_eq!(store.take(&rec.challenge_text), Some(rec.clone()));
        assert_eq!(store.take(&rec.challenge_text), None);
        assert!(store.is_empty());
    }

    #[test]
    fn retain_live_reports_removed_count() {
        let store = InMemoryChallengeStore::new();
        for nonce in ["a1", "a2", "b1"] {
            store.insert_if_vacant(record(nonce));
        }
        let removed = store.retain_live(&|r| r.nonce.starts_with('b'));
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_take_has_single_winner() {
        let store = Arc::new(InMemoryChallengeStore::new());
        let rec = record("03");
        store.insert_if_vacant(rec.clone());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let key = rec.challenge_text.clone();
                std::thread::spawn(move || store.take(&key).is_some())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
