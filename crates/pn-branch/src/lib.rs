//! pn-branch: hierarchical branch ids for pipe networks.
//!
//! Every maximal run of pipe on one logical trunk shares a branch id; every
//! offshoot gets a numbered child id (`PARENT:NNN`) of the branch it left.
//!
//! Provides:
//! - Depth table, node roles, primary selection with its tie-break cascade
//! - Per-run branch id minting
//! - The traversal engine and the in-place `assign_branch_ids` entry point
//! - Deterministic branch colours
//!
//! # Example
//!
//! ```
//! use pn_branch::assign_branch_ids;
//! use pn_graph::{EdgeRecord, NodeRecord};
//!
//! let mut nodes = vec![
//!     NodeRecord::new("G1", "GENERAL"),
//!     NodeRecord::new("J1", "JONCTION"),
//!     NodeRecord::new("A", ""),
//!     NodeRecord::new("B", ""),
//! ];
//! let mut edges = vec![
//!     EdgeRecord::new("E0", "J1", "G1"),
//!     EdgeRecord::new("E1", "A", "J1").with_diameter(160.0),
//!     EdgeRecord::new("E2", "B", "J1").with_diameter(90.0),
//! ];
//! assign_branch_ids(&mut nodes, &mut edges);
//!
//! assert_eq!(edges[1].branch_id, "GENERAL-G1");
//! assert_eq!(edges[2].branch_id, "GENERAL-G1:001");
//! ```

pub mod branch_id;
pub mod depth;
pub mod engine;
pub mod palette;
pub mod report;
pub mod selector;
pub mod separator;

use pn_graph::{EdgeRecord, GraphBuilder, Network, NodeRecord};

// Re-exports for ergonomics
pub use branch_id::{BranchIdGenerator, ensure_branch_id};
pub use depth::DepthTable;
pub use engine::{ROOT_PREFIX, TraversalContext};
pub use palette::{ColorPair, Theme, color_for_branch_id, color_pair_for_branch_id};
pub use report::{BranchAssignment, BranchReport, RootSeed, SplitBranch, SplitDecision};
pub use selector::{NO_DIRECTION_DEG, Ranking, Selection, SelectionReason, cmp_edge_ids, select_primary};
pub use separator::{NodeRole, classify, is_separator};

/// Compute branch ids for a built network without touching any record.
pub fn compute_branches(network: &Network) -> BranchAssignment {
    TraversalContext::new(network).run()
}

/// Assign `branch_id` on every node and edge record in place.
///
/// Also writes back endpoint normalization: `from_id`/`to_id` are filled
/// from `source`/`target` when blank, and edges without an id receive their
/// generated `EDGE-{n}` id. Never fails; the returned report can be ignored.
pub fn assign_branch_ids(nodes: &mut [NodeRecord], edges: &mut [EdgeRecord]) -> BranchReport {
    let network = GraphBuilder::from_records(nodes, edges).build();
    let assignment = compute_branches(&network);
    write_back(&network, &assignment, nodes, edges);
    assignment.into_report()
}

/// Copy an assignment onto the records the network was built from.
pub fn write_back(
    network: &Network,
    assignment: &BranchAssignment,
    nodes: &mut [NodeRecord],
    edges: &mut [EdgeRecord],
) {
    for (record, branch) in nodes.iter_mut().zip(assignment.node_branches()) {
        record.branch_id.clone_from(branch);
    }
    for ((record, edge), branch) in edges
        .iter_mut()
        .zip(network.edges())
        .zip(assignment.edge_branches())
    {
        record.branch_id.clone_from(branch);
        if is_blank(record.id.as_deref()) {
            record.id = Some(edge.id.clone());
        }
        if is_blank(record.from_id.as_deref()) && edge.from_id.is_some() {
            record.from_id.clone_from(&edge.from_id);
        }
        if is_blank(record.to_id.as_deref()) && edge.to_id.is_some() {
            record.to_id.clone_from(&edge.to_id);
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
