// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication protocol errors.

use super::token::TokenError;

/// Outcome of a failed protocol step.
///
/// `ChallengeNotFound` covers both "never issued" and "already redeemed";
/// callers cannot tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// A required input was empty.
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Challenge not found.")]
    ChallengeNotFound,
    /// The challenge outlived its TTL and has been discarded.
    #[error("Challenge expired.")]
    ChallengeExpired,
    #[error("Invalid Signature.")]
    InvalidSignature,
    /// A presented refresh token did not verify.
    #[error("Invalid token.")]
    InvalidToken(#[source] TokenError),
    /// Minting credentials failed. Not retried.
    #[error("Token issuance failed: {0}")]
    IssuanceFailed(String),
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidRequest(_) => "invalid_request",
            AuthError::ChallengeNotFound => "challenge_not_found",
            AuthError::ChallengeExpired => "challenge_expired",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::IssuanceFailed(_) => "issuance_failed",
            AuthError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_client_contract() {
        assert_eq!(AuthError::ChallengeNotFound.to_string(), "Challenge not found.");
        assert_eq!(AuthError::ChallengeExpired.to_string(), "Challenge expired.");
        assert_eq!(AuthError::InvalidSignature.to_string(), "Invalid Signature.");
        assert_eq!(
            AuthError::InvalidToken(TokenError::TokenExpired).to_string(),
            "Invalid token."
        );
    }

    #[test]
    fn error_codes_are_distinct() {
        let codes = [
            AuthError::InvalidRequest("x".into()).error_code(),
            AuthError::ChallengeNotFound.error_code(),
            AuthError::ChallengeExpired.error_code(),
            AuthError::InvalidSignature.error_code(),
            AuthError::InvalidToken(TokenError::MalformedToken).error_code(),
            AuthError::IssuanceFailed("x".into()).error_code(),
            AuthError::Internal("x".into()).error_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
