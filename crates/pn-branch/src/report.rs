//! Assignment results and the diagnostics gathered while computing them.

use std::collections::{BTreeMap, BTreeSet};

use pn_core::{EdgeIdx, NodeIdx};
use serde::Serialize;

use crate::selector::{Ranking, SelectionReason};

/// A source node and the branch tree it seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootSeed {
    pub node: String,
    pub branch: String,
}

/// A child branch minted at a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitBranch {
    pub edge: String,
    pub branch: String,
}

/// One ranking performed during traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitDecision {
    pub node: String,
    /// Branch arriving at the node (kept by the primary).
    pub branch: String,
    pub incoming: Option<String>,
    pub primary: String,
    pub reason: SelectionReason,
    pub splits: Vec<SplitBranch>,
    pub rankings: Vec<Ranking>,
}

/// Everything worth explaining about one assignment run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchReport {
    pub roots: Vec<RootSeed>,
    pub decisions: Vec<SplitDecision>,
    /// Child branch id -> parent branch id.
    pub parents: BTreeMap<String, String>,
    /// Edges labeled by the fallback pass, in list order.
    pub fallback_edges: Vec<String>,
    /// Nodes labeled by the fallback pass, in list order.
    pub fallback_nodes: Vec<String>,
}

impl BranchReport {
    /// Decisions taken at `node_id`, in traversal order.
    pub fn decisions_at<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a SplitDecision> {
        self.decisions.iter().filter(move |d| d.node == node_id)
    }

    /// Parent of `branch`, if it was minted as a child.
    pub fn parent_of(&self, branch: &str) -> Option<&str> {
        self.parents.get(branch).map(String::as_str)
    }

    /// Branch ids that seeded a tree (root bases).
    pub fn trunks(&self) -> BTreeSet<&str> {
        self.roots.iter().map(|r| r.branch.as_str()).collect()
    }
}

/// Branch id of every node and edge, by canonical index.
#[derive(Debug, Clone, Default)]
pub struct BranchAssignment {
    pub(crate) node_branches: Vec<String>,
    pub(crate) edge_branches: Vec<String>,
    pub report: BranchReport,
}

impl BranchAssignment {
    pub fn node_branch(&self, node: NodeIdx) -> Option<&str> {
        self.node_branches.get(node.pos()).map(String::as_str)
    }

    pub fn edge_branch(&self, edge: EdgeIdx) -> Option<&str> {
        self.edge_branches.get(edge.pos()).map(String::as_str)
    }

    pub fn node_branches(&self) -> &[String] {
        &self.node_branches
    }

    pub fn edge_branches(&self) -> &[String] {
        &self.edge_branches
    }

    /// Every distinct branch id in use.
    pub fn branch_ids(&self) -> BTreeSet<&str> {
        self.node_branches
            .iter()
            .chain(&self.edge_branches)
            .map(String::as_str)
            .collect()
    }

    pub fn into_report(self) -> BranchReport {
        self.report
    }
}
