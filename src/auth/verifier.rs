// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! Signed-request verification middleware.
//!
//! [`RequestVerifier`] holds the read-only key material and evaluates each
//! request independently; [`require_signed`] adapts it to an Axum layer
//! via `axum::middleware::from_fn_with_state`. Checks run cheapest-first:
//! header presence, API key, timestamp parse, freshness, then the HMAC.
//!
//! The body-aware and body-less variants share one code path: an empty
//! body verifies against `data = null`, a JSON body verifies against its
//! parsed value, so body-bearing requests are signed over their actual
//! content.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::Value;

use super::{
    error::AuthError,
    payload::SignedPayload,
    signer::Signer,
    timestamp::{verify_timestamp_at, REQUEST_FRESHNESS_MS},
};
use crate::state::AppState;

/// Required headers on every protected call.
pub const X_TIMESTAMP: &str = "x-timestamp";
pub const X_NONCE: &str = "x-nonce";
pub const X_SIGNATURE: &str = "x-signature";
pub const X_API_KEY: &str = "x-api-key";

const REQUIRED_HEADERS: [&str; 4] = [X_TIMESTAMP, X_NONCE, X_SIGNATURE, X_API_KEY];

/// Signed request bodies are small search filters; anything bigger is not
/// a legitimate client.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct RequestVerifier {
    signer: Arc<Signer>,
    api_key: String,
}

impl RequestVerifier {
    pub fn new(signer: Arc<Signer>, api_key: impl Into<String>) -> Self {
        Self {
            signer,
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Verify a body-less request (`data` signs as `null`).
    pub fn verify(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        self.verify_with_data(headers, &Value::Null)
    }

    /// Verify a request whose JSON body participated in the signature.
    pub fn verify_with_data(&self, headers: &HeaderMap, data: &Value) -> Result<(), AuthError> {
        self.verify_at(headers, data, Utc::now().timestamp_millis())
    }

    pub(crate) fn verify_at(
        &self,
        headers: &HeaderMap,
        data: &Value,
        now_ms: i64,
    ) -> Result<(), AuthError> {
        let missing: Vec<&'static str> = REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|name| header_str(headers, name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AuthError::MissingHeaders(missing));
        }

        // All four headers are present past this point.
        let api_key = header_str(headers, X_API_KEY).unwrap_or_default();
        if api_key != self.api_key {
            return Err(AuthError::InvalidApiKey);
        }

        let timestamp: i64 = header_str(headers, X_TIMESTAMP)
            .unwrap_or_default()
            .parse()
            .map_err(|_| AuthError::InvalidTimestampFormat)?;

        if !verify_timestamp_at(timestamp, REQUEST_FRESHNESS_MS, now_ms) {
            return Err(AuthError::StaleTimestamp);
        }

        let payload = SignedPayload {
            timestamp,
            nonce: header_str(headers, X_NONCE).unwrap_or_default().to_owned(),
            api_key: api_key.to_owned(),
            data: data.clone(),
        };
        let canonical = payload
            .canonical_json()
            .map_err(|_| AuthError::InvalidSignature)?;

        let supplied = header_str(headers, X_SIGNATURE).unwrap_or_default();
        if !self.signer.verify(&canonical, supplied) {
            return Err(AuthError::InvalidSignature);
        }

        Ok(())
    }
}

/// An absent or empty header counts as missing.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Middleware gating a router subtree behind signature verification.
///
/// The body is buffered so it can participate in verification and still
/// reach the wrapped handler untouched.
pub async fn require_signed(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return AuthError::InvalidBody.into_response(),
    };

    let data = if bytes.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(_) => return AuthError::InvalidBody.into_response(),
        }
    };

    if let Err(err) = state.verifier.verify_with_data(&parts.headers, &data) {
        tracing::warn!(
            error_code = err.error_code(),
            path = %parts.uri.path(),
            "rejected API request"
        );
        return err.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";
    const TEST_API_KEY: &str = "portal-key";
    const NOW: i64 = 1_700_000_000_000;

    fn verifier() -> RequestVerifier {
        RequestVerifier::new(Arc::new(Signer::new(TEST_SECRET).unwrap()), TEST_API_KEY)
    }

    /// Headers the way a well-behaved client produces them: signed over
    /// the canonical payload at `timestamp`.
    fn signed_headers(timestamp: i64, data: &Value) -> HeaderMap {
        let payload = SignedPayload {
            timestamp,
            nonce: "dGVzdC1ub25jZQ==".into(),
            api_key: TEST_API_KEY.into(),
            data: data.clone(),
        };
        let signer = Signer::new(TEST_SECRET).unwrap();
        let signature = signer.sign(&payload.canonical_json().unwrap());

        let mut headers = HeaderMap::new();
        headers.insert(X_TIMESTAMP, HeaderValue::from_str(&timestamp.to_string()).unwrap());
        headers.insert(X_NONCE, HeaderValue::from_static("dGVzdC1ub25jZQ=="));
        headers.insert(X_SIGNATURE, HeaderValue::from_str(&signature).unwrap());
        headers.insert(X_API_KEY, HeaderValue::from_static(TEST_API_KEY));
        headers
    }

    #[test]
    fn accepts_fresh_signed_request() {
        let verifier = verifier();
        let headers = signed_headers(NOW, &Value::Null);
        assert_eq!(verifier.verify_at(&headers, &Value::Null, NOW), Ok(()));
    }

    #[test]
    fn accepts_inside_the_window_rejects_after() {
        let verifier = verifier();
        let headers = signed_headers(NOW, &Value::Null);

        let just_inside = NOW + REQUEST_FRESHNESS_MS;
        assert_eq!(verifier.verify_at(&headers, &Value::Null, just_inside), Ok(()));

        let expired = NOW + REQUEST_FRESHNESS_MS + 1;
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, expired),
            Err(AuthError::StaleTimestamp)
        );
    }

    #[test]
    fn missing_headers_are_listed_exactly() {
        let verifier = verifier();

        let mut headers = signed_headers(NOW, &Value::Null);
        headers.remove(X_NONCE);
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::MissingHeaders(vec![X_NONCE]))
        );

        let mut headers = signed_headers(NOW, &Value::Null);
        headers.remove(X_TIMESTAMP);
        headers.remove(X_API_KEY);
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::MissingHeaders(vec![X_TIMESTAMP, X_API_KEY]))
        );

        let empty = HeaderMap::new();
        assert_eq!(
            verifier.verify_at(&empty, &Value::Null, NOW),
            Err(AuthError::MissingHeaders(REQUIRED_HEADERS.to_vec()))
        );
    }

    #[test]
    fn empty_header_value_counts_as_missing() {
        let verifier = verifier();
        let mut headers = signed_headers(NOW, &Value::Null);
        headers.insert(X_SIGNATURE, HeaderValue::from_static(""));
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::MissingHeaders(vec![X_SIGNATURE]))
        );
    }

    #[test]
    fn wrong_api_key_fails_before_signature_check() {
        let verifier = verifier();
        let mut headers = signed_headers(NOW, &Value::Null);
        headers.insert(X_API_KEY, HeaderValue::from_static("other-key"));
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::InvalidApiKey)
        );
    }

    #[test]
    fn non_numeric_timestamp_is_a_format_error() {
        let verifier = verifier();
        let mut headers = signed_headers(NOW, &Value::Null);
        headers.insert(X_TIMESTAMP, HeaderValue::from_static("yesterday"));
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::InvalidTimestampFormat)
        );
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let verifier = verifier();
        let mut headers = signed_headers(NOW, &Value::Null);
        let mut signature = headers[X_SIGNATURE].to_str().unwrap().to_owned();
        signature.replace_range(0..1, if signature.starts_with('A') { "B" } else { "A" });
        headers.insert(X_SIGNATURE, HeaderValue::from_str(&signature).unwrap());
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn body_must_match_what_was_signed() {
        let verifier = verifier();
        let signed_over = json!({"idCardNo": "TN/01/123/456789"});
        let headers = signed_headers(NOW, &signed_over);

        assert_eq!(verifier.verify_at(&headers, &signed_over, NOW), Ok(()));

        // Same shape, different value: the signature no longer covers it.
        let other = json!({"idCardNo": "TN/01/123/000000"});
        assert_eq!(
            verifier.verify_at(&headers, &other, NOW),
            Err(AuthError::InvalidSignature)
        );

        // Dropping the body downgrades data to null, which also fails.
        assert_eq!(
            verifier.verify_at(&headers, &Value::Null, NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn body_key_order_does_not_matter() {
        let verifier = verifier();
        let signed_over: Value = serde_json::from_str(r#"{"name":"Murugan","age":43}"#).unwrap();
        let headers = signed_headers(NOW, &signed_over);

        let reordered: Value = serde_json::from_str(r#"{"age":43,"name":"Murugan"}"#).unwrap();
        assert_eq!(verifier.verify_at(&headers, &reordered, NOW), Ok(()));
    }
}
