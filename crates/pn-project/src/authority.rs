//! Applying branch ids recomputed by an authoritative server.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::snapshot::GraphSnapshot;

/// Branch id returned for one entity; `null` and blank mean "no opinion".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BranchUpdate {
    pub id: String,
    #[serde(default)]
    pub branch_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorityResponse {
    #[serde(default)]
    pub nodes: Option<Vec<BranchUpdate>>,
    #[serde(default)]
    pub edges: Option<Vec<BranchUpdate>>,
    #[serde(default)]
    pub branch_diagnostics: Vec<Value>,
    #[serde(default)]
    pub branch_changes: Vec<Value>,
    #[serde(default)]
    pub branch_conflicts: Vec<Value>,
}

/// What one response did to a snapshot, plus its diagnostics verbatim.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ApplySummary {
    pub nodes_updated: usize,
    pub edges_updated: usize,
    /// Entities the response named without a usable id.
    pub kept_local: usize,
    /// Response ids matching no local entity.
    pub unmatched: Vec<String>,
    pub diagnostics: Vec<Value>,
    pub changes: Vec<Value>,
    pub conflicts: Vec<Value>,
}

/// Overwrite local branch ids with the ones in `response`, by id.
///
/// A `null` or blank id keeps the local value, so a labeled snapshot stays
/// labeled whatever sequence of responses is applied.
pub fn apply_authority_response(snapshot: &mut GraphSnapshot, response: AuthorityResponse) -> ApplySummary {
    let mut summary = ApplySummary::default();

    if let Some(updates) = &response.edges {
        let lookup = index_updates(updates, &mut summary);
        for edge in &mut snapshot.edges {
            let Some(id) = edge.id.as_deref().map(str::trim) else {
                continue;
            };
            if let Some(branch) = take(&lookup, id, &mut summary) {
                if edge.branch_id != branch {
                    edge.branch_id = branch.to_string();
                    summary.edges_updated += 1;
                }
            }
        }
        note_unmatched(&lookup, snapshot.edges.iter().filter_map(|e| e.id.as_deref()), &mut summary);
    }

    if let Some(updates) = &response.nodes {
        let lookup = index_updates(updates, &mut summary);
        for node in &mut snapshot.nodes {
            if let Some(branch) = take(&lookup, node.id.trim(), &mut summary) {
                if node.branch_id != branch {
                    node.branch_id = branch.to_string();
                    summary.nodes_updated += 1;
                }
            }
        }
        note_unmatched(&lookup, snapshot.nodes.iter().map(|n| n.id.as_str()), &mut summary);
    }

    summary.diagnostics = response.branch_diagnostics;
    summary.changes = response.branch_changes;
    summary.conflicts = response.branch_conflicts;

    debug!(
        nodes = summary.nodes_updated,
        edges = summary.edges_updated,
        kept_local = summary.kept_local,
        unmatched = summary.unmatched.len(),
        "applied authority response"
    );
    summary
}

/// Later entries for the same id replace earlier ones.
fn index_updates<'a>(updates: &'a [BranchUpdate], summary: &mut ApplySummary) -> HashMap<&'a str, Option<&'a str>> {
    let mut lookup = HashMap::with_capacity(updates.len());
    for update in updates {
        let id = update.id.trim();
        if id.is_empty() {
            summary.kept_local += 1;
            continue;
        }
        let branch = update
            .branch_id
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());
        lookup.insert(id, branch);
    }
    lookup
}

fn take<'a>(lookup: &HashMap<&str, Option<&'a str>>, id: &str, summary: &mut ApplySummary) -> Option<&'a str> {
    match lookup.get(id).copied() {
        Some(Some(branch)) => Some(branch),
        Some(None) => {
            summary.kept_local += 1;
            None
        }
        None => None,
    }
}

fn note_unmatched<'a>(
    lookup: &HashMap<&str, Option<&str>>,
    local: impl Iterator<Item = &'a str>,
    summary: &mut ApplySummary,
) {
    let local: std::collections::HashSet<&str> = local.map(str::trim).collect();
    let mut unmatched: Vec<String> = lookup
        .keys()
        .filter(|id| !local.contains(*id))
        .map(|id| id.to_string())
        .collect();
    unmatched.sort();
    summary.unmatched.extend(unmatched);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_graph::{EdgeRecord, NodeRecord};

    fn labeled() -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::new(
            vec![NodeRecord::new("G", "GENERAL"), NodeRecord::new("A", "")],
            vec![EdgeRecord::new("E1", "A", "G")],
        );
        for node in &mut snapshot.nodes {
            node.branch_id = "LOCAL".into();
        }
        snapshot.edges[0].branch_id = "LOCAL".into();
        snapshot
    }

    #[test]
    fn returned_ids_overwrite_by_lookup() {
        let mut snapshot = labeled();
        let response: AuthorityResponse = serde_json::from_str(
            r#"{
                "edges": [{"id": "E1", "branch_id": "SERVER"}],
                "nodes": [{"id": "A", "branch_id": "SERVER"}, {"id": "ZZ", "branch_id": "X"}],
                "branch_conflicts": [{"id": "E1", "kind": "rename"}]
            }"#,
        )
        .unwrap();

        let summary = apply_authority_response(&mut snapshot, response);

        assert_eq!(snapshot.edges[0].branch_id, "SERVER");
        assert_eq!(snapshot.nodes[1].branch_id, "SERVER");
        assert_eq!(snapshot.nodes[0].branch_id, "LOCAL");
        assert_eq!(summary.edges_updated, 1);
        assert_eq!(summary.nodes_updated, 1);
        assert_eq!(summary.unmatched, vec!["ZZ"]);
        assert_eq!(summary.conflicts[0]["kind"], "rename");
    }

    #[test]
    fn null_or_blank_keeps_local_value() {
        let mut snapshot = labeled();
        let response: AuthorityResponse = serde_json::from_str(
            r#"{
                "edges": [{"id": "E1", "branch_id": null}],
                "nodes": [{"id": "G", "branch_id": "  "}, {"id": "A"}]
            }"#,
        )
        .unwrap();

        let summary = apply_authority_response(&mut snapshot, response);

        assert!(snapshot.fully_labeled());
        assert_eq!(snapshot.edges[0].branch_id, "LOCAL");
        assert_eq!(summary.kept_local, 3);
        assert_eq!(summary.edges_updated + summary.nodes_updated, 0);
    }

    #[test]
    fn absent_sections_leave_entities_alone() {
        let mut snapshot = labeled();
        let summary = apply_authority_response(&mut snapshot, AuthorityResponse::default());
        assert_eq!(snapshot, labeled());
        assert!(summary.unmatched.is_empty());
    }
}
