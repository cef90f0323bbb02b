// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! Timestamp freshness checks.
//!
//! Two windows apply at different points of the flow: a signature may only
//! be *issued* for a payload stamped within the last 60 seconds, but once
//! issued it is *accepted* for up to 5 minutes. The asymmetry keeps the
//! signing endpoint from minting signatures over stale payloads while
//! giving in-flight requests a workable budget.

use chrono::Utc;

/// Issuance window: how old a payload may be when asking for a signature.
pub const SIGNING_FRESHNESS_MS: i64 = 60 * 1000;

/// Consumption window: how old a timestamp may be at verification.
pub const REQUEST_FRESHNESS_MS: i64 = 5 * 60 * 1000;

/// True iff `timestamp_ms` lies in `[now - max_age_ms, now]`.
///
/// Future timestamps fail at any positive skew; there is no tolerance for
/// clients ahead of the server clock.
pub fn verify_timestamp(timestamp_ms: i64, max_age_ms: i64) -> bool {
    verify_timestamp_at(timestamp_ms, max_age_ms, Utc::now().timestamp_millis())
}

pub(crate) fn verify_timestamp_at(timestamp_ms: i64, max_age_ms: i64, now_ms: i64) -> bool {
    let age = now_ms - timestamp_ms;
    (0..=max_age_ms).contains(&age)
}
