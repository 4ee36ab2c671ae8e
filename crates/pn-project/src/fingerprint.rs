//! Content hash of everything branch assignment depends on.

use pn_branch::{ROOT_PREFIX, ensure_branch_id};
use pn_graph::{Network, NodeKind};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::snapshot::GraphSnapshot;

#[derive(Serialize)]
struct NodeKey<'a> {
    id: &'a str,
    kind: &'static str,
    position: Option<(f64, f64)>,
    /// Base id of a source's tree.
    base: Option<String>,
}

#[derive(Serialize)]
struct EdgeKey<'a> {
    id: &'a str,
    from: Option<&'a str>,
    to: Option<&'a str>,
    diameter_mm: f64,
    created_at_ms: Option<i64>,
    geometry: Vec<(f64, f64)>,
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Source => "source",
        NodeKind::Junction => "junction",
        NodeKind::Valve => "valve",
        NodeKind::MeasurementPoint => "measurement_point",
        NodeKind::Other => "other",
    }
}

/// SHA-256 (hex) over the normalized topology: node ids, kinds and
/// positions, source base ids, edge ids, endpoints, diameters, creation
/// times and geometry.
///
/// Equal fingerprints mean a recompute yields the same branch ids for
/// everything a source reaches. Names, style metadata and stored branch ids
/// of non-source entities are ignored.
pub fn network_fingerprint(network: &Network) -> String {
    let nodes: Vec<NodeKey<'_>> = network
        .nodes()
        .iter()
        .map(|n| NodeKey {
            id: &n.id,
            kind: kind_label(n.kind),
            position: n.position.map(|p| (p.x, p.y)),
            base: (n.kind == NodeKind::Source)
                .then(|| ensure_branch_id(&n.carried_branch, &format!("{ROOT_PREFIX}{}", n.id))),
        })
        .collect();
    let edges: Vec<EdgeKey<'_>> = network
        .edges()
        .iter()
        .map(|e| EdgeKey {
            id: &e.id,
            from: e.from.and_then(|n| network.node(n)).map(|n| n.id.as_str()),
            to: e.to.and_then(|n| network.node(n)).map(|n| n.id.as_str()),
            diameter_mm: e.diameter_mm,
            created_at_ms: e.created_at_ms,
            geometry: e.geometry.iter().map(|p| (p.x, p.y)).collect(),
        })
        .collect();

    let mut hasher = Sha256::new();
    let nodes_json = serde_json::to_string(&nodes).unwrap_or_default();
    hasher.update(nodes_json.as_bytes());
    let edges_json = serde_json::to_string(&edges).unwrap_or_default();
    hasher.update(edges_json.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Fingerprint of a snapshot's records.
pub fn topology_fingerprint(snapshot: &GraphSnapshot) -> String {
    network_fingerprint(&snapshot.network())
}
