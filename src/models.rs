// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. All types derive
//! `ToSchema` for OpenAPI documentation.
//!
//! Field names follow the wire contract existing clients use: the challenge
//! message is camelCase while token fields are snake_case.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::TokenPair;

// =============================================================================
// Challenge Models
// =============================================================================

/// Request to start a login for an address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateChallengeRequest {
    /// The address to prove ownership of.
    #[schema(example = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12")]
    pub address: String,
}

/// The message the client must sign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateChallengeResponse {
    #[serde(rename = "challengeMessage")]
    pub challenge_message: String,
}

/// A signed challenge submitted for verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignChallengeRequest {
    /// The challenge message, exactly as issued.
    pub challenge: String,
    /// Hex-encoded 65-byte `personal_sign` signature over the challenge.
    pub signature: String,
}

// =============================================================================
// Token Models
// =============================================================================

/// Session credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Request to exchange a refresh token for a new pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Identity behind the presented access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MeResponse {
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_response_uses_camel_case_field() {
        let body = serde_json::to_value(CreateChallengeResponse {
            challenge_message: "msg".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "challengeMessage": "msg" }));
    }

    #[test]
    fn token_pair_uses_snake_case_fields() {
        let body = serde_json::to_value(TokenPairResponse::from(TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        }))
        .unwrap();
        assert_eq!(body, serde_json::json!({ "access_token": "a", "refresh_token": "r" }));
    }
}
