// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::{AuthError, TokenError};

const INTERNAL_MESSAGE: &str = "Internal server error.";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", INTERNAL_MESSAGE)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::InvalidRequest(_) | AuthError::InvalidSignature => StatusCode::BAD_REQUEST,
            AuthError::ChallengeNotFound => StatusCode::NOT_FOUND,
            AuthError::ChallengeExpired => StatusCode::GONE,
            AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::IssuanceFailed(_) | AuthError::Internal(_) => {
                // Details stay in the logs.
                error!(error = %err, "Authentication failed internally");
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.error_code(), INTERNAL_MESSAGE);
            }
        };
        Self::new(status, err.error_code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => {
                error!(error = %err, "Token signing failed");
                Self::internal()
            }
            other => Self::new(StatusCode::UNAUTHORIZED, other.error_code(), other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}
