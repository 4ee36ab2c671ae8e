//! Ingestion: raw records -> canonical [`Network`].

use std::collections::HashMap;

use pn_core::{EdgeIdx, Id, NodeIdx, parse_timestamp_ms};
use tracing::debug;

use crate::graph::{Edge, Network, Node, NodeKind};
use crate::indexing::Adjacency;
use crate::record::{EdgeRecord, NodeRecord};

/// Builder for constructing a network incrementally.
///
/// Use `add_node_record` / `add_edge_record` (or the short `add_node` /
/// `add_edge`), then call `build()` to resolve endpoints and freeze the
/// adjacency into an immutable `Network`. Building never fails: edges whose
/// endpoints cannot be resolved are kept but left out of every index.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest whole node and edge lists.
    pub fn from_records(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Self {
        let mut builder = Self::new();
        for node in nodes {
            builder.add_node_record(node);
        }
        for edge in edges {
            builder.add_edge_record(edge);
        }
        builder
    }

    /// Add a node record and return its index.
    pub fn add_node_record(&mut self, record: &NodeRecord) -> NodeIdx {
        let idx = Id::from_usize(self.nodes.len());
        self.nodes.push(Node {
            idx,
            id: record.id.trim().to_string(),
            kind: NodeKind::parse(&record.node_type),
            position: record.position(),
            carried_branch: record.branch_id.trim().to_string(),
        });
        idx
    }

    /// Add an edge record and return its index.
    ///
    /// A missing id becomes `EDGE-{n}` where `n` is the 1-based position.
    pub fn add_edge_record(&mut self, record: &EdgeRecord) -> EdgeIdx {
        let idx = Id::from_usize(self.edges.len());
        let id = record
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(|| format!("EDGE-{}", self.edges.len() + 1), str::to_string);

        let diameter_mm = [&record.diameter_mm, &record.ui_diameter_mm]
            .into_iter()
            .filter_map(|d| d.as_ref().and_then(|d| d.value()))
            .find(|d| *d > 0.0)
            .unwrap_or(0.0);

        self.edges.push(Edge {
            idx,
            id,
            from_id: record.from_endpoint().map(str::to_string),
            to_id: record.to_endpoint().map(str::to_string),
            from: None,
            to: None,
            diameter_mm,
            created_at_ms: record.created_at.as_deref().and_then(parse_timestamp_ms),
            geometry: record.geometry_points().unwrap_or_default(),
            carried_branch: record.branch_id.trim().to_string(),
        });
        idx
    }

    /// Add a node by id and type label.
    pub fn add_node(&mut self, id: impl Into<String>, node_type: impl Into<String>) -> NodeIdx {
        self.add_node_record(&NodeRecord::new(id, node_type))
    }

    /// Add an edge by id and endpoint ids.
    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> EdgeIdx {
        self.add_edge_record(&EdgeRecord::new(id, from, to))
    }

    /// Resolve endpoints and build the adjacency, returning an immutable `Network`.
    pub fn build(mut self) -> Network {
        let node_lookup = first_wins(self.nodes.iter().map(|n| (n.id.clone(), n.idx)));
        let edge_lookup = first_wins(self.edges.iter().map(|e| (e.id.clone(), e.idx)));

        for edge in &mut self.edges {
            edge.from = edge.from_id.as_deref().and_then(|id| node_lookup.get(id).copied());
            edge.to = edge.to_id.as_deref().and_then(|id| node_lookup.get(id).copied());
            if !edge.is_indexed() {
                debug!(edge = %edge.id, from = ?edge.from_id, to = ?edge.to_id, "edge left out of traversal");
            }
        }

        let indexed: Vec<(EdgeIdx, NodeIdx, NodeIdx)> = self
            .edges
            .iter()
            .filter_map(|e| e.endpoints().map(|(from, to)| (e.idx, from, to)))
            .collect();

        let node_count = self.nodes.len();
        let incident = Adjacency::build(
            node_count,
            indexed
                .iter()
                .flat_map(|&(edge, from, to)| [(from, edge), (to, edge)]),
        );
        let arriving = Adjacency::build(node_count, indexed.iter().map(|&(edge, _, to)| (to, edge)));
        let leaving = Adjacency::build(node_count, indexed.iter().map(|&(edge, from, _)| (from, edge)));

        Network {
            nodes: self.nodes,
            edges: self.edges,
            node_lookup,
            edge_lookup,
            incident,
            arriving,
            leaving,
        }
    }
}

fn first_wins<I: Copy>(entries: impl Iterator<Item = (String, I)>) -> HashMap<String, I> {
    let mut map = HashMap::new();
    for (key, value) in entries {
        map.entry(key).or_insert(value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::Point;

    #[test]
    fn builder_basic() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("N1", "GENERAL");
        let n2 = builder.add_node("N2", "JONCTION");
        let e1 = builder.add_edge("E1", "N2", "N1");

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(e1.index(), 0);

        let net = builder.build();
        let edge = net.edge(e1).unwrap();
        assert_eq!(edge.endpoints(), Some((n2, n1)));
        assert_eq!(net.arriving_edges(n1), &[e1]);
        assert_eq!(net.leaving_edges(n2), &[e1]);
        assert_eq!(net.degree(n1), 1);
        assert_eq!(net.degree(n2), 1);
    }

    #[test]
    fn missing_ids_and_endpoints() {
        let nodes = vec![NodeRecord::new("A", ""), NodeRecord::new("B", "")];
        let edges = vec![
            EdgeRecord {
                source: Some("A".into()),
                target: Some("B".into()),
                ..EdgeRecord::default()
            },
            EdgeRecord {
                id: Some("E2".into()),
                from_id: Some("A".into()),
                ..EdgeRecord::default()
            },
            EdgeRecord::new("E3", "A", "GHOST"),
        ];
        let net = GraphBuilder::from_records(&nodes, &edges).build();

        assert_eq!(net.edges()[0].id, "EDGE-1");
        assert!(net.edges()[0].is_indexed());
        assert!(!net.edges()[1].is_indexed());
        assert!(!net.edges()[2].is_indexed());
        assert_eq!(net.edges()[2].to_id.as_deref(), Some("GHOST"));

        let a = net.find_node("A").unwrap();
        assert_eq!(net.degree(a), 1);
        assert_eq!(net.edges().len(), 3);
    }

    #[test]
    fn diameter_and_timestamp_normalization() {
        let edges = vec![
            EdgeRecord::new("E1", "A", "B").with_diameter(160.0),
            EdgeRecord {
                diameter_mm: Some(0.0.into()),
                ui_diameter_mm: Some("90".into()),
                ..EdgeRecord::new("E2", "A", "B")
            },
            EdgeRecord {
                diameter_mm: Some((-5.0).into()),
                ..EdgeRecord::new("E3", "A", "B")
            }
            .with_created_at("not a date"),
            EdgeRecord::new("E4", "A", "B").with_created_at("2024-01-01"),
        ];
        let net = GraphBuilder::from_records(&[], &edges).build();
        let d: Vec<f64> = net.edges().iter().map(|e| e.diameter_mm).collect();
        assert_eq!(d, vec![160.0, 90.0, 0.0, 0.0]);
        assert_eq!(net.edges()[2].created_at_ms, None);
        assert_eq!(net.edges()[3].created_at_ms, Some(1_704_067_200_000));
    }

    #[test]
    fn carried_branch_and_position() {
        let nodes = vec![NodeRecord {
            branch_id: "  B1 ".into(),
            ..NodeRecord::new("N", "GENERAL").at(1.0, 2.0)
        }];
        let net = GraphBuilder::from_records(&nodes, &[]).build();
        let node = &net.nodes()[0];
        assert_eq!(node.carried_branch, "B1");
        assert_eq!(node.position, Some(Point::new(1.0, 2.0)));
        assert_eq!(node.kind, NodeKind::Source);
    }

    #[test]
    fn self_loop_counts_twice() {
        let mut builder = GraphBuilder::new();
        let n = builder.add_node("N", "");
        builder.add_edge("L", "N", "N");
        let net = builder.build();
        assert_eq!(net.degree(n), 2);
        assert_eq!(net.arriving_edges(n).len(), 1);
    }
}
