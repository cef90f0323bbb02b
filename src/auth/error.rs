// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! Request-signing rejection errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a signed request was rejected.
///
/// Malformed requests (missing headers, unparsable values) report 400;
/// authentication failures (wrong key, stale timestamp, bad signature)
/// report 403. Rejections never carry the expected signature or any key
/// material.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// One or more of the required `X-*` headers is absent or empty.
    MissingHeaders(Vec<&'static str>),
    /// `X-API-Key` does not match the configured key.
    InvalidApiKey,
    /// `X-Timestamp` is not an integer.
    InvalidTimestampFormat,
    /// Timestamp outside the acceptance window (stale or in the future).
    StaleTimestamp,
    /// Signature does not match the reconstructed payload.
    InvalidSignature,
    /// Request body present but not parsable as JSON.
    InvalidBody,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this rejection.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeaders(_) => "missing_headers",
            AuthError::InvalidApiKey => "invalid_api_key",
            AuthError::InvalidTimestampFormat => "invalid_timestamp_format",
            AuthError::StaleTimestamp => "stale_timestamp",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidBody => "invalid_body",
        }
    }

    /// Get the HTTP status code for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeaders(_)
            | AuthError::InvalidTimestampFormat
            | AuthError::InvalidBody => StatusCode::BAD_REQUEST,
            AuthError::InvalidApiKey | AuthError::StaleTimestamp | AuthError::InvalidSignature => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeaders(names) => {
                write!(f, "Missing required headers: {}", names.join(", "))
            }
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
            AuthError::InvalidTimestampFormat => write!(f, "Invalid timestamp format"),
            AuthError::StaleTimestamp => {
                write!(f, "Request timestamp expired or invalid (must be within 5 minutes)")
            }
            AuthError::InvalidSignature => write!(f, "Invalid signature"),
            AuthError::InvalidBody => write!(f, "Invalid JSON body"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
