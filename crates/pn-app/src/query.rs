//! Read-only questions about a snapshot: why, how healthy, which colours.

use pn_branch::{BranchReport, SplitDecision, Theme, color_pair_for_branch_id, compute_branches};
use pn_graph::inspect;
use pn_project::{GraphSnapshot, network_fingerprint};
use serde::Serialize;

use crate::error::AppResult;

/// The decisions behind a snapshot's branch ids.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// Set when the explanation was narrowed to one node.
    pub node: Option<NodeExplanation>,
    pub roots: Vec<pn_branch::RootSeed>,
    pub decisions: Vec<SplitDecision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeExplanation {
    pub id: String,
    pub branch: String,
    /// Branch, then its parent, up to the trunk.
    pub lineage: Vec<String>,
}

/// Recompute and explain. With `node`, keep only the decisions taken there.
pub fn explain(snapshot: &GraphSnapshot, node: Option<&str>) -> AppResult<Explanation> {
    let network = snapshot.network();
    let assignment = compute_branches(&network);

    let focus = match node {
        Some(id) => {
            let idx = network.node_idx(id)?;
            let branch = assignment.node_branch(idx).unwrap_or_default().to_string();
            Some(NodeExplanation {
                id: id.to_string(),
                lineage: lineage(&assignment.report, &branch),
                branch,
            })
        }
        None => None,
    };

    let report = assignment.into_report();
    let decisions = match &focus {
        Some(f) => report.decisions_at(&f.id).cloned().collect(),
        None => report.decisions.clone(),
    };
    Ok(Explanation {
        node: focus,
        roots: report.roots,
        decisions,
    })
}

/// `branch` followed by each ancestor.
pub fn lineage(report: &BranchReport, branch: &str) -> Vec<String> {
    let mut chain = vec![branch.to_string()];
    let mut current = branch;
    while let Some(parent) = report.parent_of(current) {
        // Cyclic parent maps only come from hand-edited reports.
        if chain.iter().any(|b| b == parent) {
            break;
        }
        chain.push(parent.to_string());
        current = parent;
    }
    chain
}

/// Structural and labeling health of a snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub issues: Vec<String>,
    pub unlabeled_nodes: Vec<String>,
    pub unlabeled_edges: Vec<String>,
    /// Entities whose stored id differs from a fresh recompute.
    pub stale: Vec<String>,
    pub orphaned_names: Vec<String>,
    pub fingerprint: String,
}

impl CheckReport {
    /// No unlabeled or stale entity. Structural issues are advisory.
    pub fn is_consistent(&self) -> bool {
        self.unlabeled_nodes.is_empty() && self.unlabeled_edges.is_empty() && self.stale.is_empty()
    }
}

pub fn check(snapshot: &GraphSnapshot) -> CheckReport {
    let network = snapshot.network();
    let assignment = compute_branches(&network);

    let unlabeled_nodes = snapshot
        .nodes
        .iter()
        .filter(|n| n.branch_id.trim().is_empty())
        .map(|n| n.id.clone())
        .collect();
    let unlabeled_edges = network
        .edges()
        .iter()
        .zip(&snapshot.edges)
        .filter(|(_, record)| record.branch_id.trim().is_empty())
        .map(|(edge, _)| edge.id.clone())
        .collect();

    let mut stale = Vec::new();
    for ((node, record), fresh) in network
        .nodes()
        .iter()
        .zip(&snapshot.nodes)
        .zip(assignment.node_branches())
    {
        let stored = record.branch_id.trim();
        if !stored.is_empty() && stored != fresh.as_str() {
            stale.push(node.id.clone());
        }
    }
    for ((edge, record), fresh) in network
        .edges()
        .iter()
        .zip(&snapshot.edges)
        .zip(assignment.edge_branches())
    {
        let stored = record.branch_id.trim();
        if !stored.is_empty() && stored != fresh.as_str() {
            stale.push(edge.id.clone());
        }
    }

    CheckReport {
        issues: inspect(&network).iter().map(ToString::to_string).collect(),
        unlabeled_nodes,
        unlabeled_edges,
        stale,
        orphaned_names: snapshot
            .names()
            .orphaned(&snapshot.used_branch_ids())
            .into_iter()
            .map(str::to_string)
            .collect(),
        fingerprint: network_fingerprint(&network),
    }
}

/// Display colour of one branch.
#[derive(Debug, Clone, Serialize)]
pub struct BranchColor {
    pub id: String,
    pub name: String,
    pub stroke: String,
    pub fill: String,
}

/// Colours of every branch id the snapshot carries, sorted by id.
pub fn branch_colors(snapshot: &GraphSnapshot, theme: Theme) -> Vec<BranchColor> {
    let names = snapshot.names();
    snapshot
        .used_branch_ids()
        .into_iter()
        .filter_map(|id| {
            let pair = color_pair_for_branch_id(&id, theme)?;
            Some(BranchColor {
                name: names.display_name(&id).to_string(),
                stroke: pair.stroke,
                fill: pair.fill,
                id,
            })
        })
        .collect()
}
