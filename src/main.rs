// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use roll_search_server::{
    api::router,
    config::{self, SigningKeys},
    state::AppState,
    store::InMemoryStore,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var(config::LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Key material is mandatory: without a strong secret and an API key
    // the protected paths must never come up.
    let keys = SigningKeys::from_env().expect("signing configuration is required");

    let store = match env::var(config::ROLL_DATA_ENV) {
        Ok(path) => InMemoryStore::from_json_file(&path).expect("failed to load roll snapshot"),
        Err(_) => InMemoryStore::new(),
    };
    tracing::info!(voters = store.voter_count(), "roll store initialized");

    let state = AppState::new(store, &keys).expect("failed to initialize application state");
    let app = router(state);

    // Parse bind address
    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Roll Search server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown signal received");
}
