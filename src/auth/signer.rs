// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! HMAC-SHA256 signature primitives.
//!
//! The signer holds the server-side shared secret. Verification recomputes
//! the expected signature and compares the base64 strings byte for byte in
//! constant time; it returns `false` on any mismatch and never panics on
//! attacker-controlled input.

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::{ConfigError, MIN_SECRET_LEN};

type HmacSha256 = Hmac<Sha256>;

pub struct Signer {
    secret: String,
}

impl Signer {
    /// Build a signer, rejecting a secret shorter than [`MIN_SECRET_LEN`].
    ///
    /// A weak secret is a fatal configuration error: signing must never
    /// silently proceed with one.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret(secret.len()));
        }
        Ok(Self { secret })
    }

    /// HMAC-SHA256 over the payload string, base64-encoded.
    pub fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        Base64::encode_string(&mac.finalize().into_bytes())
    }

    /// Check a supplied signature against the payload.
    ///
    /// Length mismatches short-circuit to `false`; equal-length inputs are
    /// compared in constant time.
    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        let expected = self.sign(payload);
        let expected = expected.as_bytes();
        let supplied = signature.as_bytes();

        if expected.len() != supplied.len() {
            tracing::debug!("signature length mismatch");
            return false;
        }

        expected.ct_eq(supplied).into()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("secret", &"<redacted>").finish()
    }
}
