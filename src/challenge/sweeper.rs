// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expired Challenge Sweeper
//!
//! Challenges are checked for expiry lazily when a client redeems them. A
//! client that never comes back leaves its record behind, so this background
//! task periodically drops every record past its TTL.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::registry::ChallengeRegistry;

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Background compaction of expired challenges.
pub struct ChallengeSweeper {
    registry: ChallengeRegistry,
    interval: Duration,
}

impl ChallengeSweeper {
    pub fn new(registry: ChallengeRegistry) -> Self {
        Self {
            registry,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Challenge sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Challenge sweeper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    /// Execute one sweep. Returns the number of records removed.
    pub fn sweep(&self) -> usize {
        let removed = self.registry.purge_expired();
        if removed > 0 {
            info!(
                removed,
                remaining = self.registry.len(),
                "Challenge sweeper: purged expired challenges"
            );
        } else {
            debug!(remaining = self.registry.len(), "Challenge sweeper: nothing to purge");
        }
        removed
    }
}
