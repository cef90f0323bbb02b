// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! # Runtime Configuration
//!
//! This module defines environment variable names and the signing key
//! configuration loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `API_SECRET` | Shared HMAC secret (min. 32 characters) | Required |
//! | `API_KEY` | Static API key expected on every signed request | Required |
//! | `ROLL_DATA` | Path to a JSON roll snapshot loaded at startup | Empty store |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ALLOWED_ORIGIN` | CORS origin for cross-origin clients | Same-origin only |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

use thiserror::Error;

/// Environment variable name for the shared HMAC secret.
///
/// The secret never leaves the server process. Clients obtain signatures
/// from the signing endpoint; they never see this value.
pub const API_SECRET_ENV: &str = "API_SECRET";

/// Environment variable name for the static API key.
///
/// Unlike the secret, the API key is embedded in the web client and travels
/// on every request in the `X-API-Key` header. It identifies the client
/// application, not a user.
pub const API_KEY_ENV: &str = "API_KEY";

/// Environment variable name for the roll snapshot path.
pub const ROLL_DATA_ENV: &str = "ROLL_DATA";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the allowed CORS origin.
///
/// When unset no CORS headers are emitted, which restricts browser access
/// to same-origin callers.
pub const ALLOWED_ORIGIN_ENV: &str = "ALLOWED_ORIGIN";

/// Environment variable name for the log format selection.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Minimum accepted length for the shared HMAC secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration errors are fatal: a protected path must never come up
/// with a missing or weak key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not configured")]
    MissingVar(&'static str),

    #[error("API secret must be at least {MIN_SECRET_LEN} characters long, got {0}")]
    WeakSecret(usize),
}

/// Immutable signing key material, loaded once at startup and passed into
/// the signer and verifier constructors.
#[derive(Clone)]
pub struct SigningKeys {
    secret: String,
    api_key: String,
}

impl SigningKeys {
    /// Build the key set, rejecting a secret shorter than [`MIN_SECRET_LEN`].
    pub fn new(secret: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret(secret.len()));
        }
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ConfigError::MissingVar(API_KEY_ENV));
        }
        Ok(Self { secret, api_key })
    }

    /// Load the key set from `API_SECRET` and `API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret =
            env::var(API_SECRET_ENV).map_err(|_| ConfigError::MissingVar(API_SECRET_ENV))?;
        let api_key = env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingVar(API_KEY_ENV))?;
        Self::new(secret, api_key)
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for SigningKeys {
    // The secret must never end up in logs or panic messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("secret", &"<redacted>")
            .field("api_key", &self.api_key)
            .finish()
    }
}
