// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! Canonical signature payload.
//!
//! The signer request and the verifier each rebuild this payload
//! independently, so both sides must produce the identical byte string.
//! Field order is fixed by the struct declaration; object keys inside
//! `data` serialize in sorted order on both sides (serde_json map
//! behavior), which keeps rebuilt payloads byte-identical regardless of
//! the key order the client originally typed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The signed unit: `{timestamp, nonce, apiKey, data}`.
///
/// `data` is `Value::Null` for body-less requests, or the parsed JSON body
/// for requests that carry one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignedPayload {
    /// Client clock, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// 128-bit random value, base64-encoded.
    pub nonce: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub data: Value,
}

impl SignedPayload {
    /// The canonical serialization handed to the MAC.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
