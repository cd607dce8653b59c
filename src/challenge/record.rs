// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge records and the message template clients sign.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Number of random bytes in a challenge nonce (rendered as 32 hex chars).
pub const NONCE_LEN: usize = 16;

/// Prefix of every challenge message, up to the address.
pub const CHALLENGE_PREFIX: &str = "Sign this message to verify your address ";

/// Build the exact text a client must sign for `address` and `nonce_hex`.
///
/// The result doubles as the registry lookup key.
pub fn challenge_message(address: &str, nonce_hex: &str) -> String {
    format!("{CHALLENGE_PREFIX}{address}: {nonce_hex}")
}

/// One outstanding proof-of-possession request.
///
/// Records are write-once: created by the registry and handed back exactly
/// once when consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRecord {
    /// Claimed key owner, opaque to the registry.
    pub subject_address: String,
    /// Hex-encoded random nonce.
    pub nonce: String,
    /// The message to sign; also the lookup key.
    pub challenge_text: String,
    /// Wall-clock creation time.
    pub issued_at: DateTime<Utc>,
}

impl ChallengeRecord {
    pub fn new(subject_address: impl Into<String>, nonce: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        let subject_address = subject_address.into();
        let nonce = nonce.into();
        let challenge_text = challenge_message(&subject_address, &nonce);
        Self {
            subject_address,
            nonce,
            challenge_text,
            issued_at,
        }
    }

    /// A record is live while `now - issued_at <= ttl`.
    ///
    /// A clock that moved backwards yields a negative age, which counts as live.
    pub fn is_live(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.issued_at);
        match TimeDelta::from_std(ttl) {
            Ok(ttl) => age <= ttl,
            // TTL beyond chrono's range never elapses
            Err(_) => true,
        }
    }
}
