//! Graph-specific error types.

use thiserror::Error;

/// Lookup errors on a built [`Network`](crate::Network).
///
/// Ingestion itself never fails; these only arise when a caller asks for an
/// id the snapshot does not contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {id} not found in network")]
    UnknownNode { id: String },

    #[error("Edge {id} not found in network")]
    UnknownEdge { id: String },
}
