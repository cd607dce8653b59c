// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthService, Eip191Verifier, JwtTokenIssuer};
use crate::challenge::ChallengeRegistry;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }

    /// Wire the production components: in-memory registry, EIP-191
    /// verification and HS256 tokens.
    pub fn from_config(config: &Config) -> Self {
        let registry = ChallengeRegistry::new(config.challenge_ttl);
        Self::new(AuthService::new(
            registry,
            Arc::new(Eip191Verifier),
            Arc::new(JwtTokenIssuer::new(&config.tokens)),
        ))
    }

    pub fn registry(&self) -> &ChallengeRegistry {
        self.auth.registry()
    }
}
