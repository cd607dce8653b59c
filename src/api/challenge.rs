// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::AppJson;
use crate::{
    error::ApiError,
    models::{CreateChallengeRequest, CreateChallengeResponse, SignChallengeRequest, TokenPairResponse},
    state::AppState,
};

/// Issue a challenge for an address.
#[utoipa::path(
    post,
    path = "/api/challenge/create",
    request_body = CreateChallengeRequest,
    tag = "Challenge",
    responses(
        (status = 200, description = "Message to sign", body = CreateChallengeResponse),
        (status = 400, description = "Address missing")
    )
)]
pub async fn create_challenge(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateChallengeRequest>,
) -> Result<Json<CreateChallengeResponse>, ApiError> {
    let record = state.auth.begin_challenge(&request.address)?;
    Ok(Json(CreateChallengeResponse {
        challenge_message: record.challenge_text,
    }))
}

/// Redeem a signed challenge for session tokens.
///
/// The challenge is consumed whether or not the signature verifies.
#[utoipa::path(
    post,
    path = "/api/challenge/sign",
    request_body = SignChallengeRequest,
    tag = "Challenge",
    responses(
        (status = 200, description = "Address proven", body = TokenPairResponse),
        (status = 400, description = "Invalid Signature."),
        (status = 404, description = "Challenge not found."),
        (status = 410, description = "Challenge expired.")
    )
)]
pub async fn sign_challenge(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignChallengeRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state
        .auth
        .complete_challenge(&request.challenge, &request.signature)?;
    Ok(Json(pair.into()))
}
