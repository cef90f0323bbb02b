// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    models::{Part2025, PartSummary},
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PollingStationsQuery {
    /// Constituency selector, e.g. `AC210`.
    pub tsc: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PollingStations2025Query {
    /// 2002-basis constituency selector, e.g. `AC210`.
    pub constituency: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartListResponse {
    pub success: bool,
    pub data: Vec<PartSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Part2025ListResponse {
    pub success: bool,
    pub data: Vec<Part2025>,
}

/// Polling-station parts of one constituency (2002 basis).
#[utoipa::path(
    get,
    path = "/v1/polling-stations",
    params(PollingStationsQuery),
    tag = "PollingStations",
    responses(
        (status = 200, description = "Parts of the constituency", body = PartListResponse),
        (status = 400, description = "Missing constituency parameter"),
        (status = 403, description = "Request signature rejected")
    )
)]
pub async fn polling_stations(
    State(state): State<AppState>,
    Query(query): Query<PollingStationsQuery>,
) -> Result<Json<PartListResponse>, ApiError> {
    let tsc = query
        .tsc
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::bad_request("Constituency (tsc) parameter is required"))?;

    // An unparsable selector matches no constituency and yields an empty
    // list rather than an error.
    let data = match parse_constituency(&tsc) {
        Some(ac_no) => state.store.parts_for_constituency(ac_no),
        None => Vec::new(),
    };

    Ok(Json(PartListResponse {
        success: true,
        data,
    }))
}

/// Polling-station parts of the 2025 draft rolls.
///
/// With a `constituency` parameter, resolves the 2002 AC through the
/// boundary mapping and returns the mapped 2025 stations; without one,
/// returns all of them.
#[utoipa::path(
    get,
    path = "/v1/polling-stations-2025",
    params(PollingStations2025Query),
    tag = "PollingStations",
    responses(
        (status = 200, description = "2025 parts", body = Part2025ListResponse),
        (status = 403, description = "Request signature rejected")
    )
)]
pub async fn polling_stations_2025(
    State(state): State<AppState>,
    Query(query): Query<PollingStations2025Query>,
) -> Result<Json<Part2025ListResponse>, ApiError> {
    let data = match query.constituency.filter(|value| !value.is_empty()) {
        Some(constituency) => match parse_constituency(&constituency) {
            Some(ac_no_2002) => state.store.parts_2025_for_2002(ac_no_2002),
            None => Vec::new(),
        },
        None => state.store.all_parts_2025(),
    };

    Ok(Json(Part2025ListResponse {
        success: true,
        data,
    }))
}

/// Extract the AC number from an `AC<nnn>` selector.
fn parse_constituency(selector: &str) -> Option<i32> {
    selector
        .strip_prefix("AC")
        .unwrap_or(selector)
        .parse()
        .ok()
}
