// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! # API Data Models
//!
//! This module defines the roll data structures served by the REST API.
//! All types derive `Serialize`, `Deserialize`, and `ToSchema` for JSON
//! handling and OpenAPI documentation.
//!
//! Wire field names are camelCase and follow the published roll data
//! layout: `fmNameV2`/`rlnFmNmV2` carry the Tamil rendering of the voter
//! and relation names, `fmNameEn`/`rlnFmNmEn` the English rendering.
//!
//! ## Model Categories
//!
//! - **Voters**: one entry per elector in a constituency part
//! - **Parts**: polling-station parts of the 2002-basis rolls
//! - **Parts 2025**: polling-station parts of the 2025 draft rolls
//! - **Part mappings**: 2002 AC/part to 2025 AC/part correspondence

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Voter Models
// =============================================================================

/// A single elector entry from the roll.
///
/// Every voter belongs to an assembly constituency (`acNo`), a
/// polling-station part within it (`partNo`), and holds a serial number
/// within that part (`slNoInPart`). The remaining fields come straight from
/// the roll extraction and are all optional.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    /// Assembly constituency number.
    pub ac_no: i32,
    /// Polling-station part number within the constituency.
    pub part_no: i32,
    /// Serial number of the voter within the part.
    pub sl_no_in_part: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_no: Option<String>,
    /// Voter name, Tamil rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fm_name_v2: Option<String>,
    /// Voter name, English rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fm_name_en: Option<String>,
    /// Relation (father/husband/mother) name, Tamil rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rln_fm_nm_v2: Option<String>,
    /// Relation name, English rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rln_fm_nm_en: Option<String>,
    /// Relation type code (`H`, `F`, `M`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rln_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// Elector photo identity card (EPIC) number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_card_no: Option<String>,
    /// Polling-station name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps_name: Option<String>,
}

// =============================================================================
// Part Models
// =============================================================================

/// A polling-station part from the 2002-basis rolls.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub state_code: String,
    pub district_no: i32,
    pub ac_no: i32,
    pub part_no: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name_v1: Option<String>,
}

/// Projection of a [`Part`] as served by the polling-stations endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartSummary {
    pub part_no: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name_v1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name_en: Option<String>,
}

impl From<&Part> for PartSummary {
    fn from(part: &Part) -> Self {
        Self {
            part_no: part.part_no,
            part_name_v1: part.part_name_v1.clone(),
            part_name_en: part.part_name_en.clone(),
        }
    }
}

/// A polling-station part from the 2025 draft rolls.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part2025 {
    pub ac_no: i32,
    pub part_no: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name_tn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_name_v1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality_tn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality_v1: Option<String>,
}

/// Correspondence between a 2002 AC/part and its 2025 counterpart.
///
/// Constituency boundaries were redrawn between the two roll editions, so
/// one 2002 constituency maps to a set of 2025 `(acNo, partNo)` pairs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartMapping {
    pub ac_no_2002: i32,
    pub part_no_2002: i32,
    pub ac_no_2025: i32,
    pub part_no_2025: i32,
}
