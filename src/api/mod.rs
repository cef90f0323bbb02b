// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

use std::env;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{verifier::require_signed, X_API_KEY, X_NONCE, X_SIGNATURE, X_TIMESTAMP},
    config,
    models::{Part2025, PartSummary, VoterRecord},
    state::AppState,
};

pub mod health;
pub mod parts;
pub mod sign;
pub mod voters;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/voters/search", get(voters::search_voters))
        .route("/voters/lookup", post(voters::lookup_voter))
        .route("/polling-stations", get(parts::polling_stations))
        .route("/polling-stations-2025", get(parts::polling_stations_2025))
        .layer(middleware::from_fn_with_state(state.clone(), require_signed));

    let v1 = Router::new()
        .route("/auth/sign", post(sign::sign_payload))
        .merge(protected);

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    // Without a configured origin no CORS headers are emitted, keeping the
    // API same-origin only.
    match cors_layer() {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer() -> Option<CorsLayer> {
    let origin = env::var(config::ALLOWED_ORIGIN_ENV).ok()?;
    let origin = origin.parse::<HeaderValue>().ok()?;
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(X_TIMESTAMP),
                HeaderName::from_static(X_NONCE),
                HeaderName::from_static(X_SIGNATURE),
                HeaderName::from_static(X_API_KEY),
            ]),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        sign::sign_payload,
        voters::search_voters,
        voters::lookup_voter,
        parts::polling_stations,
        parts::polling_stations_2025
    ),
    components(
        schemas(
            VoterRecord,
            PartSummary,
            Part2025,
            sign::SignRequest,
            sign::SignResponse,
            voters::SearchResponse,
            voters::Pagination,
            voters::LookupRequest,
            voters::LookupResponse,
            parts::PartListResponse,
            parts::Part2025ListResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Signature issuance"),
        (name = "Voters", description = "Voter search and lookup"),
        (name = "PollingStations", description = "Polling-station listings"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
