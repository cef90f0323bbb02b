// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Roll Search Project

//! In-memory roll store.
//!
//! The roll is read-only reference data: it is loaded once at startup from a
//! prepared JSON snapshot and never mutated while serving. Query semantics
//! match the published portal: name fields match case-insensitive
//! substrings across both the Tamil and English renderings, everything else
//! matches exactly, and conditions AND-combine.

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Part, Part2025, PartMapping, PartSummary, VoterRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read roll snapshot: {0}")]
    Io(#[from] io::Error),

    #[error("roll snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Voter search filter. Unset fields do not constrain the result.
#[derive(Debug, Default, Clone)]
pub struct VoterFilter {
    /// Substring over the voter name and relation name fields, both scripts.
    pub name: Option<String>,
    /// Substring over the relation name fields, both scripts.
    pub relation_name: Option<String>,
    pub house_no: Option<String>,
    pub id_card_no: Option<String>,
    pub part_no: Option<i32>,
    pub age: Option<i32>,
    /// Matched uppercased against the stored value.
    pub sex: Option<String>,
}

/// One page of voter search results, plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub voters: Vec<VoterRecord>,
    pub total: usize,
}

/// On-disk snapshot layout. Every section is optional so partial exports
/// (e.g. a single constituency without 2025 data) still load.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RollSnapshot {
    #[serde(default)]
    voters: Vec<VoterRecord>,
    #[serde(default)]
    parts: Vec<Part>,
    #[serde(default)]
    parts2025: Vec<Part2025>,
    #[serde(default)]
    part_map: Vec<PartMapping>,
}

#[derive(Default)]
pub struct InMemoryStore {
    voters: Vec<VoterRecord>,
    parts: Vec<Part>,
    parts_2025: Vec<Part2025>,
    part_map: Vec<PartMapping>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a roll snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path)?;
        let snapshot: RollSnapshot = serde_json::from_str(&raw)?;
        Ok(Self {
            voters: snapshot.voters,
            parts: snapshot.parts,
            parts_2025: snapshot.parts2025,
            part_map: snapshot.part_map,
        })
    }

    pub fn insert_voter(&mut self, voter: VoterRecord) {
        self.voters.push(voter);
    }

    pub fn insert_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn insert_part_2025(&mut self, part: Part2025) {
        self.parts_2025.push(part);
    }

    pub fn insert_part_mapping(&mut self, mapping: PartMapping) {
        self.part_map.push(mapping);
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Run a filtered voter search, sorted by `(acNo, partNo, slNoInPart)`,
    /// returning the requested page and the total match count.
    ///
    /// `page` is 1-based; a `page` of 0 is treated as 1.
    pub fn search_voters(&self, filter: &VoterFilter, page: usize, limit: usize) -> SearchPage {
        let mut matches: Vec<&VoterRecord> = self
            .voters
            .iter()
            .filter(|voter| filter.matches(voter))
            .collect();
        matches.sort_by_key(|v| (v.ac_no, v.part_no, v.sl_no_in_part));

        let total = matches.len();
        let skip = page.max(1).saturating_sub(1).saturating_mul(limit);
        let voters = matches
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        SearchPage { voters, total }
    }

    /// Exact lookup by EPIC number.
    pub fn find_by_id_card(&self, id_card_no: &str) -> Option<&VoterRecord> {
        self.voters
            .iter()
            .find(|voter| voter.id_card_no.as_deref() == Some(id_card_no))
    }

    /// Parts of one constituency, sorted by part number.
    pub fn parts_for_constituency(&self, ac_no: i32) -> Vec<PartSummary> {
        let mut parts: Vec<&Part> = self.parts.iter().filter(|p| p.ac_no == ac_no).collect();
        parts.sort_by_key(|p| p.part_no);
        parts.into_iter().map(PartSummary::from).collect()
    }

    /// 2025 parts that map back to the given 2002 constituency.
    ///
    /// Boundaries were redrawn between editions, so the result can span
    /// several 2025 ACs. A constituency with no recorded mapping yields an
    /// empty list, not the full roll.
    pub fn parts_2025_for_2002(&self, ac_no_2002: i32) -> Vec<Part2025> {
        let mapped: Vec<(i32, i32)> = self
            .part_map
            .iter()
            .filter(|m| m.ac_no_2002 == ac_no_2002)
            .map(|m| (m.ac_no_2025, m.part_no_2025))
            .collect();

        let mut parts: Vec<Part2025> = self
            .parts_2025
            .iter()
            .filter(|p| mapped.contains(&(p.ac_no, p.part_no)))
            .cloned()
            .collect();
        parts.sort_by_key(|p| (p.ac_no, p.part_no));
        parts
    }

    /// All 2025 parts, sorted by `(acNo, partNo)`.
    pub fn all_parts_2025(&self) -> Vec<Part2025> {
        let mut parts = self.parts_2025.clone();
        parts.sort_by_key(|p| (p.ac_no, p.part_no));
        parts
    }
}

impl VoterFilter {
    fn matches(&self, voter: &VoterRecord) -> bool {
        if let Some(name) = &self.name {
            // The combined name filter looks at the relation fields too, so
            // a search for a father's name still finds the household.
            let hit = contains_ci(&voter.fm_name_v2, name)
                || contains_ci(&voter.fm_name_en, name)
                || contains_ci(&voter.rln_fm_nm_v2, name)
                || contains_ci(&voter.rln_fm_nm_en, name);
            if !hit {
                return false;
            }
        }

        if let Some(relation) = &self.relation_name {
            let hit = contains_ci(&voter.rln_fm_nm_v2, relation)
                || contains_ci(&voter.rln_fm_nm_en, relation);
            if !hit {
                return false;
            }
        }

        if let Some(house_no) = &self.house_no {
            if voter.house_no.as_deref() != Some(house_no.as_str()) {
                return false;
            }
        }

        if let Some(id_card_no) = &self.id_card_no {
            if voter.id_card_no.as_deref() != Some(id_card_no.as_str()) {
                return false;
            }
        }

        if let Some(part_no) = self.part_no {
            if voter.part_no != part_no {
                return false;
            }
        }

        if let Some(age) = self.age {
            if voter.age != Some(age) {
                return false;
            }
        }

        if let Some(sex) = &self.sex {
            let wanted = sex.to_uppercase();
            if voter.sex.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }

        true
    }
}

fn contains_ci(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(ac_no: i32, part_no: i32, sl_no: i32) -> VoterRecord {
        VoterRecord {
            ac_no,
            part_no,
            sl_no_in_part: sl_no,
            house_no: None,
            section_no: None,
            fm_name_v2: None,
            fm_name_en: None,
            rln_fm_nm_v2: None,
            rln_fm_nm_en: None,
            rln_type: None,
            age: None,
            sex: None,
            id_card_no: None,
            ps_name: None,
        }
    }

    fn seeded_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();

        let mut murugan = voter(210, 3, 17);
        murugan.fm_name_en = Some("Murugan".into());
        murugan.fm_name_v2 = Some("முருகன்".into());
        murugan.rln_fm_nm_en = Some("Kandan".into());
        murugan.age = Some(43);
        murugan.sex = Some("M".into());
        murugan.house_no = Some("12A".into());
        murugan.id_card_no = Some("TN/01/123/456789".into());
        store.insert_voter(murugan);

        let mut valli = voter(210, 1, 4);
        valli.fm_name_en = Some("Valli".into());
        valli.rln_fm_nm_en = Some("Murugan".into());
        valli.age = Some(39);
        valli.sex = Some("F".into());
        store.insert_voter(valli);

        let mut other_ac = voter(211, 2, 1);
        other_ac.fm_name_en = Some("Sundar".into());
        store.insert_voter(other_ac);

        store
    }

    #[test]
    fn name_filter_spans_voter_and_relation_fields() {
        let store = seeded_store();
        let filter = VoterFilter {
            name: Some("murugan".into()),
            ..Default::default()
        };

        // Matches Murugan himself and Valli, whose relation is Murugan.
        let page = store.search_voters(&filter, 1, 50);
        assert_eq!(page.total, 2);
        let names: Vec<_> = page
            .voters
            .iter()
            .map(|v| v.fm_name_en.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["Valli", "Murugan"]); // (210,1,4) before (210,3,17)
    }

    #[test]
    fn relation_filter_only_matches_relation_fields() {
        let store = seeded_store();
        let filter = VoterFilter {
            relation_name: Some("murugan".into()),
            ..Default::default()
        };
        let page = store.search_voters(&filter, 1, 50);
        assert_eq!(page.total, 1);
        assert_eq!(page.voters[0].fm_name_en.as_deref(), Some("Valli"));
    }

    #[test]
    fn filters_and_combine() {
        let store = seeded_store();
        let filter = VoterFilter {
            name: Some("murugan".into()),
            sex: Some("m".into()), // uppercased before matching
            age: Some(43),
            house_no: Some("12A".into()),
            ..Default::default()
        };
        let page = store.search_voters(&filter, 1, 50);
        assert_eq!(page.total, 1);
        assert_eq!(page.voters[0].fm_name_en.as_deref(), Some("Murugan"));
    }

    #[test]
    fn tamil_substring_search() {
        let store = seeded_store();
        let filter = VoterFilter {
            name: Some("முருக".into()),
            ..Default::default()
        };
        let page = store.search_voters(&filter, 1, 50);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn pagination_skips_and_reports_total() {
        let mut store = InMemoryStore::new();
        for sl_no in 1..=7 {
            store.insert_voter(voter(210, 1, sl_no));
        }

        let filter = VoterFilter::default();
        let first = store.search_voters(&filter, 1, 3);
        assert_eq!(first.total, 7);
        assert_eq!(
            first.voters.iter().map(|v| v.sl_no_in_part).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let last = store.search_voters(&filter, 3, 3);
        assert_eq!(last.voters.len(), 1);
        assert_eq!(last.voters[0].sl_no_in_part, 7);

        let beyond = store.search_voters(&filter, 4, 3);
        assert!(beyond.voters.is_empty());
        assert_eq!(beyond.total, 7);
    }

    #[test]
    fn find_by_id_card_is_exact() {
        let store = seeded_store();
        assert!(store.find_by_id_card("TN/01/123/456789").is_some());
        assert!(store.find_by_id_card("TN/01/123/45678").is_none());
    }

    #[test]
    fn parts_for_constituency_sorted_by_part_no() {
        let mut store = InMemoryStore::new();
        for part_no in [5, 1, 3] {
            store.insert_part(Part {
                state_code: "S22".into(),
                district_no: 14,
                ac_no: 210,
                part_no,
                part_name_en: Some(format!("Part {part_no}")),
                part_name_v1: None,
            });
        }
        store.insert_part(Part {
            state_code: "S22".into(),
            district_no: 14,
            ac_no: 211,
            part_no: 1,
            part_name_en: None,
            part_name_v1: None,
        });

        let parts = store.parts_for_constituency(210);
        assert_eq!(
            parts.iter().map(|p| p.part_no).collect::<Vec<_>>(),
            vec![1, 3, 5]
        );
    }

    #[test]
    fn parts_2025_follow_the_mapping() {
        let mut store = InMemoryStore::new();
        store.insert_part_2025(Part2025 {
            ac_no: 215,
            part_no: 9,
            part_name_tn: None,
            part_name_v1: Some("Mapped".into()),
            locality_tn: None,
            locality_v1: None,
        });
        store.insert_part_2025(Part2025 {
            ac_no: 216,
            part_no: 1,
            part_name_tn: None,
            part_name_v1: Some("Unmapped".into()),
            locality_tn: None,
            locality_v1: None,
        });
        store.insert_part_mapping(PartMapping {
            ac_no_2002: 210,
            part_no_2002: 4,
            ac_no_2025: 215,
            part_no_2025: 9,
        });

        let mapped = store.parts_2025_for_2002(210);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].part_name_v1.as_deref(), Some("Mapped"));

        // A constituency with no mapping yields nothing.
        assert!(store.parts_2025_for_2002(999).is_empty());

        assert_eq!(store.all_parts_2025().len(), 2);
    }

    #[test]
    fn snapshot_sections_are_optional() {
        let snapshot: RollSnapshot =
            serde_json::from_str(r#"{"voters":[{"acNo":210,"partNo":1,"slNoInPart":1}]}"#).unwrap();
        assert_eq!(snapshot.voters.len(), 1);
        assert!(snapshot.parts.is_empty());
        assert!(snapshot.part_map.is_empty());
    }
}
