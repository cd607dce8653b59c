// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests.
    pub status: String,
    /// Challenges issued but not yet redeemed or swept.
    pub outstanding_challenges: usize,
}

/// Liveness probe with registry occupancy.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        outstanding_challenges: state.registry().len(),
    })
}

/// Plain-text greeting kept for existing clients.
#[utoipa::path(
    get,
    path = "/api/greeting",
    tag = "Health",
    responses(
        (status = 200, description = "Greeting", body = String)
    )
)]
pub async fn greeting() -> &'static str {
    "hello world"
}
