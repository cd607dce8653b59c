// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge-response authentication service.
//!
//! ## Protocol
//!
//! 1. `begin_challenge(address)` stores a fresh challenge and returns the
//!    message to sign.
//! 2. The client signs the message with the address's key (off-band).
//! 3. `complete_challenge(message, signature)` consumes the challenge, checks
//!    the signature against the stored address and mints a token pair.
//!
//! Each challenge affords exactly one verification attempt: it is consumed
//! before the signature is checked, so a failed attempt burns it and the
//! client has to start over.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::AuthError;
use super::signature::SignatureVerifier;
use super::token::{TokenError, TokenIssuer, TokenKind, TokenPair};
use crate::challenge::{ChallengeError, ChallengeRecord, ChallengeRegistry};

/// Orchestrates challenge issuance, verification and token minting.
pub struct AuthService {
    registry: ChallengeRegistry,
    verifier: Arc<dyn SignatureVerifier>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        registry: ChallengeRegistry,
        verifier: Arc<dyn SignatureVerifier>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            registry,
            verifier,
            tokens,
        }
    }

    pub fn registry(&self) -> &ChallengeRegistry {
        &self.registry
    }

    /// Issue a challenge for `subject_address`.
    pub fn begin_challenge(&self, subject_address: &str) -> Result<ChallengeRecord, AuthError> {
        if subject_address.trim().is_empty() {
            return Err(AuthError::InvalidRequest("address must not be empty".to_string()));
        }

        let record = self.registry.create(subject_address).map_err(|e| {
            AuthError::Internal(format!("challenge creation failed: {e}"))
        })?;

        info!(action = "challenge_issued", address = %record.subject_address, "Challenge issued");
        Ok(record)
    }

    /// Redeem a signed challenge for a token pair.
    pub fn complete_challenge(
        &self,
        challenge_text: &str,
        signature: &str,
    ) -> Result<TokenPair, AuthError> {
        if challenge_text.is_empty() {
            return Err(AuthError::InvalidRequest("challenge must not be empty".to_string()));
        }
        if signature.trim().is_empty() {
            return Err(AuthError::InvalidRequest("signature must not be empty".to_string()));
        }

        let record = self.registry.consume(challenge_text).map_err(|e| match e {
            ChallengeError::NotFound => AuthError::ChallengeNotFound,
            ChallengeError::Expired => AuthError::ChallengeExpired,
            other => AuthError::Internal(other.to_string()),
        })?;

        let address = record.subject_address;
        match self
            .verifier
            .verify(&address, record.challenge_text.as_bytes(), signature)
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(action = "auth_failed", address = %address, "Signature does not match address");
                return Err(AuthError::InvalidSignature);
            }
            Err(e) => {
                warn!(action = "auth_failed", address = %address, error = %e, "Signature could not be verified");
                return Err(AuthError::InvalidSignature);
            }
        }

        let pair = self
            .tokens
            .issue(&address)
            .map_err(|e| AuthError::IssuanceFailed(e.to_string()))?;

        info!(action = "auth_success", address = %address, "Address authenticated");
        Ok(pair)
    }

    /// Exchange a valid refresh token for a new token pair.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let subject = self
            .tokens
            .verify(TokenKind::Refresh, refresh_token)
            .map_err(|e| {
                warn!(action = "refresh_failed", error = %e, "Refresh token rejected");
                AuthError::InvalidToken(e)
            })?;

        let pair = self
            .tokens
            .issue(&subject)
            .map_err(|e| AuthError::IssuanceFailed(e.to_string()))?;

        info!(action = "tokens_refreshed", address = %subject, "Session refreshed");
        Ok(pair)
    }

    /// Check an access token and return the address it was issued to.
    pub fn authenticate(&self, access_token: &str) -> Result<String, TokenError> {
        self.tokens.verify(TokenKind::Access, access_token)
    }
}
