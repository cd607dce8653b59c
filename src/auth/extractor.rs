// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated addresses.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(caller): Auth) -> impl IntoResponse {
//!     // caller.address is the address proven at login
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::TokenError;
use crate::error::ApiError;
use crate::state::AppState;

/// Identity established by a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAddress {
    pub address: String,
}

/// Extractor for authenticated callers.
///
/// Reads `Authorization: Bearer <access token>` and rejects with 401 when the
/// header is missing or the token does not verify as an access token.
pub struct Auth(pub AuthenticatedAddress);

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(TokenError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| TokenError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(TokenError::InvalidAuthHeader)?;

        let address = state.auth.authenticate(token.trim())?;
        Ok(Auth(AuthenticatedAddress { address }))
    }
}
