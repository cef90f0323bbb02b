// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! Signing endpoint.
//!
//! The browser client cannot hold the shared secret, so it asks this
//! endpoint to sign its canonical payload and then attaches the returned
//! signature to the real request. The endpoint validates the embedded API
//! key and a tight 60-second issuance window before signing, and signs the
//! payload string exactly as received: re-serializing it here could
//! reorder bytes and break verification later.

use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, PRAGMA},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    auth::{verify_timestamp, SIGNING_FRESHNESS_MS},
    error::ApiError,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignRequest {
    /// JSON-serialized `{timestamp, nonce, apiKey, data}` payload.
    pub payload: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignResponse {
    pub signature: String,
}

/// Signature issuance handler.
///
/// Responses carry `Cache-Control: no-store` so no intermediary ever
/// serves a cached signature.
#[utoipa::path(
    post,
    path = "/v1/auth/sign",
    request_body = SignRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Signature over the supplied payload", body = SignResponse),
        (status = 400, description = "Malformed or stale payload"),
        (status = 403, description = "API key mismatch")
    )
)]
pub async fn sign_payload(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let parsed: Value = serde_json::from_str(&request.payload)
        .map_err(|_| ApiError::bad_request("Payload must be a valid JSON string"))?;

    let timestamp = parsed.get("timestamp").and_then(Value::as_i64);
    let nonce = parsed
        .get("nonce")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    let api_key = parsed
        .get("apiKey")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());

    let (Some(timestamp), Some(_nonce), Some(api_key)) = (timestamp, nonce, api_key) else {
        return Err(ApiError::bad_request(
            "Missing required fields: timestamp, nonce, apiKey",
        ));
    };

    if api_key != state.verifier.api_key() {
        return Err(ApiError::forbidden("Invalid API key"));
    }

    if !verify_timestamp(timestamp, SIGNING_FRESHNESS_MS) {
        return Err(ApiError::bad_request("Timestamp expired or invalid"));
    }

    let signature = state.signer.sign(&request.payload);

    Ok((
        [
            (CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (PRAGMA, "no-cache"),
        ],
        Json(SignResponse { signature }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};
    use chrono::Utc;

    use crate::{auth::SignedPayload, config::SigningKeys, store::InMemoryStore};

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";
    const TEST_API_KEY: &str = "portal-key";

    fn state() -> AppState {
        let keys = SigningKeys::new(TEST_SECRET, TEST_API_KEY).unwrap();
        AppState::new(InMemoryStore::new(), &keys).unwrap()
    }

    fn fresh_payload(api_key: &str) -> String {
        SignedPayload {
            timestamp: Utc::now().timestamp_millis(),
            nonce: "dGVzdC1ub25jZQ==".into(),
            api_key: api_key.into(),
            data: serde_json::Value::Null,
        }
        .canonical_json()
        .unwrap()
    }

    #[tokio::test]
    async fn signs_a_fresh_payload() {
        let state = state();
        let payload = fresh_payload(TEST_API_KEY);

        let response = sign_payload(
            State(state.clone()),
            Json(SignRequest {
                payload: payload.clone(),
            }),
        )
        .await
        .expect("signing succeeds")
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CACHE_CONTROL],
            "no-store, no-cache, must-revalidate"
        );

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let signature = body["signature"].as_str().unwrap();
        assert!(state.signer.verify(&payload, signature));
    }

    #[tokio::test]
    async fn rejects_non_json_payload() {
        let err = sign_payload(
            State(state()),
            Json(SignRequest {
                payload: "not json".into(),
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Payload must be a valid JSON string");
    }

    #[tokio::test]
    async fn rejects_payload_missing_fields() {
        let err = sign_payload(
            State(state()),
            Json(SignRequest {
                payload: r#"{"timestamp":1700000000000,"nonce":"abc"}"#.into(),
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing required fields: timestamp, nonce, apiKey");
    }

    #[tokio::test]
    async fn rejects_wrong_api_key() {
        let err = sign_payload(
            State(state()),
            Json(SignRequest {
                payload: fresh_payload("other-key"),
            }),
        )
        .await
        .err().unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Invalid API key");
    }

    #[tokio::test]
    async fn rejects_stale_issuance_timestamp() {
        let stale = SignedPayload {
            timestamp: Utc::now().timestamp_millis() - 2 * SIGNING_FRESHNESS_MS,
            nonce: "dGVzdC1ub25jZQ==".into(),
            api_key: TEST_API_KEY.into(),
            data: serde_json::Value::Null,
        }
        .canonical_json()
        .unwrap();

        let err = sign_payload(State(state()), Json(SignRequest { payload: stale }))
            .await
            .err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Timestamp expired or invalid");
    }
}
