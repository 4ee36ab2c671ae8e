//! pn-graph: network model layer for pipenet.
//!
//! Provides:
//! - Wire records for nodes and edges, with their alternate spellings
//! - Ingestion into one canonical `Network` with compact adjacency
//! - Non-fatal diagnostics over a built network
//!
//! # Example
//!
//! ```
//! use pn_graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::new();
//! let g = builder.add_node("G1", "GENERAL");
//! let j = builder.add_node("J1", "JONCTION");
//! builder.add_edge("E1", "J1", "G1");
//! let network = builder.build();
//!
//! assert_eq!(network.arriving_edges(g).len(), 1);
//! assert_eq!(network.degree(j), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod record;
pub mod validate;

// Re-exports for ergonomics
pub use builder::GraphBuilder;
pub use error::GraphError;
pub use graph::{Edge, Network, Node, NodeKind};
pub use indexing::Adjacency;
pub use record::{EdgeRecord, Extra, GeoObject, GeoPoint, NodeRecord};
pub use validate::{GraphIssue, inspect};
