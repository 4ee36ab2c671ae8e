//! Canonical network data structures.

use std::collections::HashMap;

use pn_core::{EdgeIdx, NodeIdx, Point, Real};

use crate::error::GraphError;
use crate::indexing::Adjacency;

/// Role a node plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Supply point; every branch tree starts at one (`GENERAL`).
    Source,
    /// Explicit branch point (`JONCTION`).
    Junction,
    /// Pass-through (`VANNE`).
    Valve,
    /// Pass-through (`POINT_MESURE`).
    MeasurementPoint,
    Other,
}

impl NodeKind {
    /// Classify a type label, case-insensitively.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "GENERAL" | "SOURCE" => NodeKind::Source,
            "JONCTION" | "JUNCTION" => NodeKind::Junction,
            "VANNE" | "VALVE" => NodeKind::Valve,
            "POINT_MESURE" | "MEASUREMENT_POINT" => NodeKind::MeasurementPoint,
            _ => NodeKind::Other,
        }
    }

    /// Pass-through kinds relay a branch and never start one.
    pub fn is_pass_through(self) -> bool {
        matches!(self, NodeKind::Valve | NodeKind::MeasurementPoint)
    }
}

/// A node after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub idx: NodeIdx,
    pub id: String,
    pub kind: NodeKind,
    pub position: Option<Point>,
    /// Branch id the node carried on input (trimmed, possibly empty).
    pub carried_branch: String,
}

/// An edge after ingestion: one canonical shape for every spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub idx: EdgeIdx,
    pub id: String,
    /// Normalized upstream endpoint text (`from_id`, else `source`).
    pub from_id: Option<String>,
    /// Normalized downstream endpoint text (`to_id`, else `target`).
    pub to_id: Option<String>,
    /// Resolved upstream node; `None` when missing or unknown.
    pub from: Option<NodeIdx>,
    /// Resolved downstream node; `None` when missing or unknown.
    pub to: Option<NodeIdx>,
    /// Own diameter if positive, else the fallback diameter if positive, else 0.
    pub diameter_mm: Real,
    pub created_at_ms: Option<i64>,
    /// Polyline from the `from` end to the `to` end; empty when unusable.
    pub geometry: Vec<Point>,
    pub carried_branch: String,
}

impl Edge {
    /// Both endpoints, if the edge takes part in the indices.
    pub fn endpoints(&self) -> Option<(NodeIdx, NodeIdx)> {
        Some((self.from?, self.to?))
    }

    pub fn is_indexed(&self) -> bool {
        self.endpoints().is_some()
    }
}

/// The network: an immutable, indexed snapshot of nodes and edges.
///
/// Stores:
/// - All nodes and edges in vectors (indexed by `NodeIdx` / `EdgeIdx`).
/// - Compact adjacency for incident, arriving (`to` = node) and leaving
///   (`from` = node) edges.
///
/// Edges lacking a resolvable endpoint are kept in `edges` but appear in no
/// adjacency list.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) node_lookup: HashMap<String, NodeIdx>,
    pub(crate) edge_lookup: HashMap<String, EdgeIdx>,
    pub(crate) incident: Adjacency,
    pub(crate) arriving: Adjacency,
    pub(crate) leaving: Adjacency,
}

impl Network {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all edges, indexed or not.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get a node by index (returns None if out of bounds).
    pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
        self.nodes.get(idx.pos())
    }

    /// Get an edge by index (returns None if out of bounds).
    pub fn edge(&self, idx: EdgeIdx) -> Option<&Edge> {
        self.edges.get(idx.pos())
    }

    /// Look up a node by its string id (first occurrence wins).
    pub fn find_node(&self, id: &str) -> Option<NodeIdx> {
        self.node_lookup.get(id).copied()
    }

    /// Look up an edge by its string id (first occurrence wins).
    pub fn find_edge(&self, id: &str) -> Option<EdgeIdx> {
        self.edge_lookup.get(id).copied()
    }

    /// Like [`Network::find_node`], as a `Result`.
    pub fn node_idx(&self, id: &str) -> Result<NodeIdx, GraphError> {
        self.find_node(id).ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }

    /// Like [`Network::find_edge`], as a `Result`.
    pub fn edge_idx(&self, id: &str) -> Result<EdgeIdx, GraphError> {
        self.find_edge(id).ok_or_else(|| GraphError::UnknownEdge { id: id.to_string() })
    }

    /// Edges whose `to` end is the node.
    pub fn arriving_edges(&self, node: NodeIdx) -> &[EdgeIdx] {
        self.arriving.of(node)
    }

    /// Edges whose `from` end is the node.
    pub fn leaving_edges(&self, node: NodeIdx) -> &[EdgeIdx] {
        self.leaving.of(node)
    }

    /// Number of incident edge ends (a self loop counts twice).
    pub fn degree(&self, node: NodeIdx) -> usize {
        self.incident.of(node).len()
    }

    /// Source nodes, sorted by id.
    pub fn sources(&self) -> Vec<NodeIdx> {
        let mut roots: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Source)
            .collect();
        roots.sort_by(|a, b| a.id.cmp(&b.id).then(a.idx.cmp(&b.idx)));
        roots.into_iter().map(|n| n.idx).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_labels() {
        assert_eq!(NodeKind::parse("GENERAL"), NodeKind::Source);
        assert_eq!(NodeKind::parse(" jonction "), NodeKind::Junction);
        assert_eq!(NodeKind::parse("Vanne"), NodeKind::Valve);
        assert_eq!(NodeKind::parse("POINT_MESURE"), NodeKind::MeasurementPoint);
        assert_eq!(NodeKind::parse("PUITS"), NodeKind::Other);
        assert_eq!(NodeKind::parse(""), NodeKind::Other);
    }

    #[test]
    fn pass_through_kinds() {
        assert!(NodeKind::Valve.is_pass_through());
        assert!(NodeKind::MeasurementPoint.is_pass_through());
        assert!(!NodeKind::Junction.is_pass_through());
        assert!(!NodeKind::Source.is_pass_through());
    }
}
