// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::{Auth, AuthenticatedAddress};
use crate::models::MeResponse;

impl From<AuthenticatedAddress> for MeResponse {
    fn from(caller: AuthenticatedAddress) -> Self {
        Self {
            address: caller.address,
        }
    }
}

/// Get the address behind the presented access token.
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated address", body = MeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(caller): Auth) -> Json<MeResponse> {
    Json(caller.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_authenticated_address() {
        let caller = AuthenticatedAddress {
            address: "0xABC".to_string(),
        };
        let Json(body) = get_current_user(Auth(caller)).await;
        assert_eq!(body.address, "0xABC");
    }
}
