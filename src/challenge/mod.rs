// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Challenge Module
//!
//! Issues and tracks one-time challenges a wallet owner signs to prove key
//! possession.
//!
//! ## Lifecycle
//!
//! 1. `ChallengeRegistry::create` draws a 16-byte nonce and stores a record
//!    keyed by the exact message text the client must sign.
//! 2. `ChallengeRegistry::consume` atomically removes the record. Unknown or
//!    already redeemed texts read as `NotFound`; records older than the TTL
//!    read as `Expired` and are removed all the same.
//! 3. `ChallengeSweeper` periodically drops expired records nobody redeemed.
//!
//! Using the signed text as the key means a tampered message never matches a
//! record, whatever its signature.

pub mod clock;
pub mod nonce;
pub mod record;
pub mod registry;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use nonce::{NonceSource, RandomSourceError, SystemNonceSource};
pub use record::{challenge_message, ChallengeRecord, CHALLENGE_PREFIX, NONCE_LEN};
pub use registry::{ChallengeError, ChallengeRegistry};
pub use store::{ChallengeStore, InMemoryChallengeStore};
pub use sweeper::ChallengeSweeper;
