// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! Signing client for the protected API.
//!
//! Mirrors the browser helper: the caller never holds the shared secret,
//! so every request is a two-hop exchange — ask `/v1/auth/sign` for a
//! signature over the canonical payload, then send the real request with
//! the signed headers attached. A failed signing call fails the whole
//! request; there is no unsigned fallback.

use std::time::Duration;

use base64ct::{Base64, Encoding};
use chrono::Utc;
use rand::{rngs::OsRng, RngCore};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{SignedPayload, X_API_KEY, X_NONCE, X_SIGNATURE, X_TIMESTAMP};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),

    #[error("signing request failed: {0}")]
    Signing(reqwest::Error),

    #[error("signing endpoint refused the payload: HTTP {0}")]
    SigningDenied(StatusCode),

    #[error("signing endpoint returned an invalid response: {0}")]
    InvalidSignResponse(String),

    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Request(reqwest::Error),
}

/// HTTP client that signs every outgoing request.
#[derive(Debug, Clone)]
pub struct SignedClient {
    base_url: String,
    api_key: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct SignResponseBody {
    signature: String,
}

impl SignedClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            http,
        })
    }

    /// Signed GET; the signature covers `data = null`.
    pub async fn get(&self, path_and_query: &str) -> Result<reqwest::Response, ClientError> {
        self.send(Method::GET, path_and_query, None, HeaderMap::new())
            .await
    }

    /// Signed POST; the signature covers the JSON body.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<reqwest::Response, ClientError> {
        self.send(Method::POST, path, Some(body), HeaderMap::new())
            .await
    }

    /// Sign and send a request, merging in caller headers (which win on
    /// conflict).
    pub async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&Value>,
        extra_headers: HeaderMap,
    ) -> Result<reqwest::Response, ClientError> {
        let signed = self.signed_headers(body).await?;
        let headers = merge_headers(signed, extra_headers);

        let mut request = self
            .http
            .request(method, format!("{}{path_and_query}", self.base_url))
            .headers(headers);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        request.send().await.map_err(ClientError::Request)
    }

    /// Produce the four signed headers (plus content-type) for a request
    /// carrying `data`.
    pub async fn signed_headers(&self, data: Option<&Value>) -> Result<HeaderMap, ClientError> {
        let timestamp = Utc::now().timestamp_millis();
        let nonce = generate_nonce();

        let payload = SignedPayload {
            timestamp,
            nonce: nonce.clone(),
            api_key: self.api_key.clone(),
            data: data.cloned().unwrap_or(Value::Null),
        }
        .canonical_json()?;

        let signature = self.fetch_signature(&payload).await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(X_TIMESTAMP),
            header_value(&timestamp.to_string())?,
        );
        headers.insert(HeaderName::from_static(X_NONCE), header_value(&nonce)?);
        headers.insert(HeaderName::from_static(X_SIGNATURE), header_value(&signature)?);
        headers.insert(HeaderName::from_static(X_API_KEY), header_value(&self.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn fetch_signature(&self, payload: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/v1/auth/sign", self.base_url))
            .json(&json!({ "payload": payload }))
            .send()
            .await
            .map_err(ClientError::Signing)?;

        if !response.status().is_success() {
            return Err(ClientError::SigningDenied(response.status()));
        }

        let body: SignResponseBody = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidSignResponse(e.to_string()))?;
        Ok(body.signature)
    }
}

/// 16 bytes from the OS CSPRNG, base64-encoded.
fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    Base64::encode_string(&bytes)
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidSignResponse("value not representable as a header".into()))
}

fn merge_headers(signed: HeaderMap, extra: HeaderMap) -> HeaderMap {
    let mut merged = signed;
    for (name, value) in extra.iter() {
        merged.insert(name.clone(), value.clone());
    }
    merged
}
