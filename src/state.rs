// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

use std::sync::Arc;

use crate::{
    auth::{RequestVerifier, Signer},
    config::{ConfigError, SigningKeys},
    store::InMemoryStore,
};

/// Shared application state.
///
/// The roll store is read-only after startup and the key material is
/// immutable, so handlers share plain `Arc`s with no locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub signer: Arc<Signer>,
    pub verifier: RequestVerifier,
}

impl AppState {
    pub fn new(store: InMemoryStore, keys: &SigningKeys) -> Result<Self, ConfigError> {
        let signer = Arc::new(Signer::new(keys.secret())?);
        let verifier = RequestVerifier::new(Arc::clone(&signer), keys.api_key());
        Ok(Self {
            store: Arc::new(store),
            signer,
            verifier,
        })
    }
}
