//! Non-fatal network diagnostics.
//!
//! Nothing here rejects a network: branch assignment copes with all of these
//! conditions. The report exists so editors can show the user why part of
//! the network ended up with fallback branch ids.

use std::collections::HashSet;
use std::fmt;

use crate::graph::{Network, NodeKind};

/// A condition worth surfacing to whoever maintains the network data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// An edge has no upstream or downstream endpoint at all.
    MissingEndpoint { edge: String },

    /// An edge names an endpoint that is not in the node list.
    UnknownEndpoint { edge: String, node: String },

    /// An edge starts and ends at the same node.
    SelfLoop { edge: String },

    /// Two nodes share an id; only the first is addressable.
    DuplicateNode { id: String },

    /// Two edges share an id; only the first is addressable.
    DuplicateEdge { id: String },

    /// A node with no incident edges.
    IsolatedNode { id: String },

    /// A non-source node that only has arriving edges. No walk from a source
    /// can reach it, so its upstream run is labeled by the fallback pass.
    HeadlessNode { id: String },

    /// No source node exists, so every id comes from the fallback pass.
    NoSource,
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::MissingEndpoint { edge } => {
                write!(f, "Edge {} is missing an endpoint", edge)
            }
            GraphIssue::UnknownEndpoint { edge, node } => {
                write!(f, "Edge {} refers to non-existent node {}", edge, node)
            }
            GraphIssue::SelfLoop { edge } => {
                write!(f, "Edge {} starts and ends at the same node", edge)
            }
            GraphIssue::DuplicateNode { id } => write!(f, "Node id {} is used twice", id),
            GraphIssue::DuplicateEdge { id } => write!(f, "Edge id {} is used twice", id),
            GraphIssue::IsolatedNode { id } => write!(f, "Node {} has no connections", id),
            GraphIssue::HeadlessNode { id } => {
                write!(f, "Node {} is not a source and no edge leaves it", id)
            }
            GraphIssue::NoSource => write!(f, "Network has no GENERAL source node"),
        }
    }
}

/// Collect every diagnostic for `network`, in a stable order.
pub fn inspect(network: &Network) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for node in network.nodes() {
        if !seen.insert(node.id.as_str()) {
            issues.push(GraphIssue::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for edge in network.edges() {
        if !seen.insert(edge.id.as_str()) {
            issues.push(GraphIssue::DuplicateEdge {
                id: edge.id.clone(),
            });
        }

        match (&edge.from_id, &edge.to_id) {
            (Some(from), Some(to)) => {
                for (text, resolved) in [(from, edge.from), (to, edge.to)] {
                    if resolved.is_none() {
                        issues.push(GraphIssue::UnknownEndpoint {
                            edge: edge.id.clone(),
                            node: text.clone(),
                        });
                    }
                }
                if from == to {
                    issues.push(GraphIssue::SelfLoop {
                        edge: edge.id.clone(),
                    });
                }
            }
            _ => issues.push(GraphIssue::MissingEndpoint {
                edge: edge.id.clone(),
            }),
        }
    }

    for node in network.nodes() {
        if network.degree(node.idx) == 0 {
            issues.push(GraphIssue::IsolatedNode {
                id: node.id.clone(),
            });
        } else if network.leaving_edges(node.idx).is_empty() && node.kind != NodeKind::Source {
            issues.push(GraphIssue::HeadlessNode {
                id: node.id.clone(),
            });
        }
    }

    if !network.nodes().is_empty() && network.sources().is_empty() {
        issues.push(GraphIssue::NoSource);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::record::EdgeRecord;

    #[test]
    fn inspect_empty_network() {
        let net = GraphBuilder::new().build();
        assert!(inspect(&net).is_empty());
    }

    #[test]
    fn inspect_reports_bad_edges() {
        let mut builder = GraphBuilder::new();
        builder.add_node("G", "GENERAL");
        builder.add_node("A", "");
        builder.add_edge("E1", "A", "G");
        builder.add_edge("E1", "A", "NOPE");
        builder.add_edge("L", "A", "A");
        builder.add_edge_record(&EdgeRecord {
            id: Some("E9".into()),
            to_id: Some("G".into()),
            ..EdgeRecord::default()
        });
        let issues = inspect(&builder.build());

        assert!(issues.contains(&GraphIssue::DuplicateEdge { id: "E1".into() }));
        assert!(issues.contains(&GraphIssue::UnknownEndpoint {
            edge: "E1".into(),
            node: "NOPE".into()
        }));
        assert!(issues.contains(&GraphIssue::SelfLoop { edge: "L".into() }));
        assert!(issues.contains(&GraphIssue::MissingEndpoint { edge: "E9".into() }));
        assert!(!issues.contains(&GraphIssue::NoSource));
    }

    #[test]
    fn inspect_reports_nodes() {
        let mut builder = GraphBuilder::new();
        builder.add_node("A", "JONCTION");
        builder.add_node("A", "");
        builder.add_node("B", "");
        builder.add_node("C", "");
        builder.add_edge("E1", "B", "A");
        let issues = inspect(&builder.build());

        assert_eq!(
            issues,
            vec![
                GraphIssue::DuplicateNode { id: "A".into() },
                GraphIssue::HeadlessNode { id: "A".into() },
                GraphIssue::IsolatedNode { id: "A".into() },
                GraphIssue::IsolatedNode { id: "C".into() },
                GraphIssue::NoSource,
            ]
        );
        assert_eq!(issues[4].to_string(), "Network has no GENERAL source node");
    }
}
