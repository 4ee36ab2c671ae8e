//! Branch catalog: one entry per branch id, with its name and lineage.

use std::collections::{BTreeMap, BTreeSet};

use pn_branch::BranchReport;
use serde::{Deserialize, Serialize};

use crate::names::BranchNames;
use crate::snapshot::GraphSnapshot;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<String>,
    #[serde(default, alias = "isTrunk")]
    pub is_trunk: bool,
}

impl BranchMeta {
    fn sort_key(&self) -> String {
        let label = if self.name.is_empty() { &self.id } else { &self.name };
        label.to_lowercase()
    }
}

/// Merge stored entries with the ids in use after an assignment.
///
/// Stored entries come first and win; later duplicates only fill in a
/// missing name, parent or trunk flag. Ids in `used` without an entry get
/// one named from the registry (or by their id). Lineage comes from the
/// report. The result is sorted by lower-cased name, then id.
pub fn build_catalog(
    existing: &[BranchMeta],
    used: &BTreeSet<String>,
    report: &BranchReport,
    names: BranchNames<'_>,
) -> Vec<BranchMeta> {
    let trunks = report.trunks();
    let derived = used.iter().map(|id| BranchMeta {
        id: id.clone(),
        name: String::new(),
        parent_id: report.parent_of(id).map(str::to_string),
        is_trunk: trunks.contains(id.as_str()),
    });

    let mut merged: BTreeMap<String, BranchMeta> = BTreeMap::new();
    for entry in existing.iter().cloned().chain(derived) {
        let id = entry.id.trim().to_string();
        if id.is_empty() {
            continue;
        }
        let name = match entry.name.trim() {
            "" => names.name(&id).unwrap_or_default().to_string(),
            n => n.to_string(),
        };
        let parent_id = entry
            .parent_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        match merged.get_mut(&id) {
            Some(found) => {
                if found.name.is_empty() {
                    found.name = name;
                }
                if found.parent_id.is_none() {
                    found.parent_id = parent_id;
                }
                found.is_trunk |= entry.is_trunk;
            }
            None => {
                merged.insert(
                    id.clone(),
                    BranchMeta {
                        id,
                        name,
                        parent_id,
                        is_trunk: entry.is_trunk,
                    },
                );
            }
        }
    }

    let mut catalog: Vec<BranchMeta> = merged
        .into_values()
        .map(|mut meta| {
            if meta.name.is_empty() {
                meta.name = meta.id.clone();
            }
            meta
        })
        .collect();
    catalog.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.id.cmp(&b.id)));
    catalog
}

/// Rebuild `snapshot.branches` from its current labels. Returns whether the
/// catalog changed.
pub fn sync_catalog(snapshot: &mut GraphSnapshot, report: &BranchReport) -> bool {
    let next = build_catalog(
        &snapshot.branches,
        &snapshot.used_branch_ids(),
        report,
        snapshot.names(),
    );
    let changed = next != snapshot.branches;
    snapshot.branches = next;
    changed
}
