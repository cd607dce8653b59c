// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets and
//! carrying separate lifetimes. Each token names its own type in the `typ`
//! claim, so a refresh token never passes as an access token even when both
//! secrets are the same.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Which of the two credentials a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Credentials minted after a successful proof of possession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the authenticated address.
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
    /// Token kind
    pub typ: TokenKind,
}

/// Token errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Authorization header is required")]
    MissingAuthHeader,
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    #[error("Token is malformed")]
    MalformedToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Expected a {expected} token")]
    WrongTokenType { expected: TokenKind },
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::MissingAuthHeader => "missing_auth_header",
            TokenError::InvalidAuthHeader => "invalid_auth_header",
            TokenError::MalformedToken => "malformed_token",
            TokenError::TokenExpired => "token_expired",
            TokenError::InvalidSignature => "invalid_token_signature",
            TokenError::WrongTokenType { .. } => "wrong_token_type",
            TokenError::Signing(_) => "token_signing_failed",
        }
    }
}

/// Mints and checks session credentials for an authenticated address.
pub trait TokenIssuer: Send + Sync {
    /// Mint an access/refresh pair whose subject is `subject`.
    fn issue(&self, subject: &str) -> Result<TokenPair, TokenError>;

    /// Check `token` as a `kind` token and return its subject.
    fn verify(&self, kind: TokenKind, token: &str) -> Result<String, TokenError>;
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn from_secret(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// HS256 JWT issuer.
pub struct JwtTokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl JwtTokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            access: SigningKeys::from_secret(&config.access_secret, config.access_ttl),
            refresh: SigningKeys::from_secret(&config.refresh_secret, config.refresh_ttl),
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn sign(&self, kind: TokenKind, subject: &str, now: i64) -> Result<String, TokenError> {
        let keys = self.keys(kind);
        // Sub-second lifetimes round up so a token is never born expired.
        let lifetime = i64::try_from(keys.ttl.as_secs().max(1)).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(lifetime),
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, subject: &str) -> Result<TokenPair, TokenError> {
        let now = Utc::now().timestamp();
        Ok(TokenPair {
            access_token: self.sign(TokenKind::Access, subject, now)?,
            refresh_token: self.sign(TokenKind::Refresh, subject, now)?,
        })
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<TokenClaims>(token, &self.keys(kind).decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::MalformedToken,
            })?;

        if token_data.claims.typ != kind {
            return Err(TokenError::WrongTokenType { expected: kind });
        }
        Ok(token_data.claims.sub)
    }
}
