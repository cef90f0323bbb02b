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
    models::VoterRecord,
    state::AppState,
    store::VoterFilter,
};

/// Default page size, matching the portal's result table.
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Substring over voter and relation names, Tamil and English.
    pub name: Option<String>,
    /// Substring over relation names only.
    pub relation_name: Option<String>,
    pub house_no: Option<String>,
    pub id_card_no: Option<String>,
    pub part_no: Option<i32>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<VoterRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    /// EPIC number, matched exactly.
    pub id_card_no: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LookupResponse {
    pub success: bool,
    pub data: VoterRecord,
}

/// Voter search across one or more filter fields.
///
/// Empty-string parameters are treated as absent, mirroring how the
/// search form submits untouched fields.
#[utoipa::path(
    get,
    path = "/v1/voters/search",
    params(SearchQuery),
    tag = "Voters",
    responses(
        (status = 200, description = "Matching voters, paginated", body = SearchResponse),
        (status = 403, description = "Request signature rejected")
    )
)]
pub async fn search_voters(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);

    let filter = VoterFilter {
        name: non_empty(query.name),
        relation_name: non_empty(query.relation_name),
        house_no: non_empty(query.house_no),
        id_card_no: non_empty(query.id_card_no),
        part_no: query.part_no,
        age: query.age,
        sex: non_empty(query.sex),
    };

    let result = state.store.search_voters(&filter, page, limit);
    let total_pages = result.total.div_ceil(limit);

    Ok(Json(SearchResponse {
        success: true,
        pagination: Pagination {
            total: result.total,
            page,
            limit,
            total_pages,
        },
        data: result.voters,
    }))
}

/// Exact voter lookup by EPIC number.
///
/// The JSON body participates in signature verification, so the looked-up
/// number is exactly what the client signed.
#[utoipa::path(
    post,
    path = "/v1/voters/lookup",
    request_body = LookupRequest,
    tag = "Voters",
    responses(
        (status = 200, description = "The matching voter", body = LookupResponse),
        (status = 404, description = "No voter holds this EPIC number"),
        (status = 403, description = "Request signature rejected")
    )
)]
pub async fn lookup_voter(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let voter = state
        .store
        .find_by_id_card(&request.id_card_no)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Voter not found"))?;

    Ok(Json(LookupResponse {
        success: true,
        data: voter,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
