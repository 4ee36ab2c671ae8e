//! Snapshot schema: a whole network as exchanged with editors and servers.

use std::collections::{BTreeMap, BTreeSet};

use pn_graph::{EdgeRecord, Extra, GraphBuilder, Network, NodeRecord};
use serde::{Deserialize, Serialize};

use crate::catalog::BranchMeta;
use crate::names::BranchNames;

/// Version written into snapshots created from scratch.
pub const SNAPSHOT_VERSION: &str = "1.5";

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub style_meta: StyleMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<BranchMeta>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Presentation metadata. Only the branch name registry is interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleMeta {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branch_names_by_id: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self {
            version: default_version(),
            site_id: None,
            generated_at: None,
            style_meta: StyleMeta::default(),
            branches: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            extra: Extra::new(),
        }
    }
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self {
            nodes,
            edges,
            ..Self::default()
        }
    }

    /// Normalized network built from the records.
    pub fn network(&self) -> Network {
        GraphBuilder::from_records(&self.nodes, &self.edges).build()
    }

    pub fn names(&self) -> BranchNames<'_> {
        BranchNames::new(&self.style_meta.branch_names_by_id)
    }

    /// Every non-blank branch id carried by a node or edge.
    pub fn used_branch_ids(&self) -> BTreeSet<String> {
        self.nodes
            .iter()
            .map(|n| n.branch_id.trim())
            .chain(self.edges.iter().map(|e| e.branch_id.trim()))
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True when every node and edge carries a branch id.
    pub fn fully_labeled(&self) -> bool {
        self.nodes.iter().all(|n| !n.branch_id.trim().is_empty())
            && self.edges.iter().all(|e| !e.branch_id.trim().is_empty())
    }
}
