// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! # Request-Signing Module
//!
//! This module implements the HMAC request-signing scheme that gates the
//! search API. It exists to stop direct curl/Postman access while letting
//! the same-origin web client call the endpoints.
//!
//! ## Signing Flow
//!
//! 1. The client builds the canonical payload
//!    `{timestamp, nonce, apiKey, data}` (millisecond clock, 16 random
//!    bytes of nonce, `data` is the JSON body or `null`)
//! 2. The client POSTs the serialized payload to `/v1/auth/sign`; the
//!    server validates the API key and a 60-second issuance window, then
//!    returns the HMAC-SHA256 signature of the exact string
//! 3. The client attaches `X-Timestamp`, `X-Nonce`, `X-Signature` and
//!    `X-API-Key` to the real request
//! 4. The verifier middleware rebuilds the canonical payload from the
//!    headers (and body, when present) and checks the signature with a
//!    constant-time comparison, inside a 5-minute freshness window
//!
//! ## Security
//!
//! - The shared secret never crosses the server boundary; clients only
//!   ever see signatures
//! - Signature comparison is length-checked then constant-time
//! - Issuance (60 s) and consumption (5 min) freshness windows are
//!   configured independently
//! - Nonces are not tracked, so a captured request stays replayable until
//!   its timestamp expires

pub mod error;
pub mod payload;
pub mod signer;
pub mod timestamp;
pub mod verifier;

pub use error::AuthError;
pub use payload::SignedPayload;
pub use signer::Signer;
pub use timestamp::{verify_timestamp, REQUEST_FRESHNESS_MS, SIGNING_FRESHNESS_MS};
pub use verifier::{RequestVerifier, X_API_KEY, X_NONCE, X_SIGNATURE, X_TIMESTAMP};
