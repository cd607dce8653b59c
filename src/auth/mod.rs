// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Proof-of-possession login for wallet addresses.
//!
//! ## Auth Flow
//!
//! 1. Client requests a challenge for its address (`AuthService::begin_challenge`)
//! 2. Client signs the challenge text with the address's key
//! 3. Server consumes the challenge, recovers the signer and compares it to
//!    the stored address (`AuthService::complete_challenge`)
//! 4. On success the server mints an access/refresh token pair
//! 5. Client sends `Authorization: Bearer <access token>`; the `Auth`
//!    extractor checks it and yields the address
//!
//! ## Security
//!
//! - A challenge can be redeemed once, even under concurrent submissions
//! - A failed verification burns the challenge
//! - Access and refresh tokens use separate secrets and a `typ` claim
//! - Clock skew tolerance is 60 seconds

pub mod error;
pub mod extractor;
pub mod service;
pub mod signature;
pub mod token;

pub use error::AuthError;
pub use extractor::{Auth, AuthenticatedAddress};
pub use service::AuthService;
pub use signature::{Eip191Verifier, SignatureError, SignatureVerifier};
pub use token::{JwtTokenIssuer, TokenClaims, TokenError, TokenIssuer, TokenKind, TokenPair};
