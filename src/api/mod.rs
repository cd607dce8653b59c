// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{FromRequest, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{
        CreateChallengeRequest, CreateChallengeResponse, MeResponse, RefreshRequest,
        SignChallengeRequest, TokenPairResponse,
    },
    state::AppState,
};

pub mod challenge;
pub mod health;
pub mod token;
pub mod users;

/// JSON body extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/greeting", get(health::greeting))
        .route("/challenge/create", post(challenge::create_challenge))
        .route("/challenge/sign", post(challenge::sign_challenge))
        .route("/token/refresh", post(token::refresh_tokens))
        .route("/me", get(users::get_current_user))
        .with_state(state.clone());

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    Router::new()
        .route("/health", get(health::health))
        .with_state(state)
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(trace)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Registers the bearer scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::greeting,
        challenge::create_challenge,
        challenge::sign_challenge,
        token::refresh_tokens,
        users::get_current_user
    ),
    components(
        schemas(
            health::HealthResponse,
            CreateChallengeRequest,
            CreateChallengeResponse,
            SignChallengeRequest,
            TokenPairResponse,
            RefreshRequest,
            MeResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and greeting"),
        (name = "Challenge", description = "Challenge issuance and redemption"),
        (name = "Token", description = "Session token refresh"),
        (name = "Users", description = "Authenticated identity")
    )
)]
struct ApiDoc;
