// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::AppJson;
use crate::{
    error::ApiError,
    models::{RefreshRequest, TokenPairResponse},
    state::AppState,
};

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = RefreshRequest,
    tag = "Token",
    responses(
        (status = 200, description = "New session tokens", body = TokenPairResponse),
        (status = 401, description = "Invalid token.")
    )
)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    AppJson(request): AppJson<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state.auth.refresh(&request.refresh_token)?;
    Ok(Json(pair.into()))
}
