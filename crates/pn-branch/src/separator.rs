//! Node roles: where a branch may split.

use pn_core::NodeIdx;
use pn_graph::{Network, NodeKind};

/// Minimum incident degree at which an untyped node becomes a branch point.
pub const SPLIT_DEGREE: usize = 3;

/// How a node treats the branch arriving at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Valve or measurement point: always relays, never splits.
    PassThrough,
    /// Junction, or any other node with degree >= 3: ranks its candidates.
    BranchPoint,
    /// Everything else: continues all candidates under the same branch.
    Relay,
}

pub fn classify(network: &Network, node: NodeIdx) -> NodeRole {
    let Some(n) = network.node(node) else {
        return NodeRole::Relay;
    };
    match n.kind {
        kind if kind.is_pass_through() => NodeRole::PassThrough,
        NodeKind::Junction => NodeRole::BranchPoint,
        _ if network.degree(node) >= SPLIT_DEGREE => NodeRole::BranchPoint,
        _ => NodeRole::Relay,
    }
}

/// True when the node may fan into several branches.
pub fn is_separator(network: &Network, node: NodeIdx) -> bool {
    classify(network, node) == NodeRole::BranchPoint
}
