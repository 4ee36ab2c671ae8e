//! Primary edge selection at a branch point.
//!
//! Candidates are ranked by: diameter (desc), depth (desc), creation time
//! (asc, unknown last), angle at the node (asc), edge id (asc). The first
//! candidate continues the current branch.

use std::cmp::Ordering;
use std::fmt;

use pn_core::{EdgeIdx, NodeIdx, Real, TIMESTAMP_UNKNOWN, Vec2, heading_delta_deg};
use pn_graph::{Edge, Network};
use serde::Serialize;

use crate::depth::DepthTable;

/// Heading change used when direction cannot be established.
pub const NO_DIRECTION_DEG: Real = 180.0;

const DIAMETER_EPS: Real = 1e-6;
const ANGLE_EPS: Real = 1e-3;

/// Which criterion separated the primary from the runner-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    SingleOutlet,
    Diameter,
    Depth,
    CreatedAt,
    Angle,
    EdgeId,
}

impl SelectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionReason::SingleOutlet => "single_outlet",
            SelectionReason::Diameter => "diameter",
            SelectionReason::Depth => "depth",
            SelectionReason::CreatedAt => "created_at",
            SelectionReason::Angle => "angle",
            SelectionReason::EdgeId => "edge_id",
        }
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranking tuple of one candidate edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    #[serde(skip)]
    pub edge: EdgeIdx,
    pub edge_id: String,
    pub diameter_mm: Real,
    pub depth: u32,
    pub created_at_ms: Option<i64>,
    pub angle_delta_deg: Real,
}

impl Ranking {
    fn created_at_key(&self) -> i64 {
        self.created_at_ms.unwrap_or(TIMESTAMP_UNKNOWN)
    }

    /// Total order: better candidates compare `Less`.
    pub fn cmp_priority(&self, other: &Self) -> Ordering {
        other
            .diameter_mm
            .total_cmp(&self.diameter_mm)
            .then_with(|| other.depth.cmp(&self.depth))
            .then_with(|| self.created_at_key().cmp(&other.created_at_key()))
            .then_with(|| self.angle_delta_deg.total_cmp(&other.angle_delta_deg))
            .then_with(|| cmp_edge_ids(&self.edge_id, &other.edge_id))
            .then_with(|| self.edge.cmp(&other.edge))
    }
}

/// Edge id order: case-insensitive, then byte order among ids that differ
/// only in case.
pub fn cmp_edge_ids(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Outcome of ranking the candidates at one node.
#[derive(Debug, Clone)]
pub struct Selection {
    pub primary: EdgeIdx,
    pub reason: SelectionReason,
    /// All candidates, best first; `ranked[0]` is the primary.
    pub ranked: Vec<Ranking>,
}

impl Selection {
    /// Candidates that leave the current branch, in rank order.
    pub fn splits(&self) -> impl DoubleEndedIterator<Item = &Ranking> {
        self.ranked.iter().skip(1)
    }
}

/// Rank `candidates` (edges arriving at `node`) and pick the primary.
///
/// `incoming` is the edge the current branch used to reach `node`, if any.
/// Returns `None` only for an empty candidate list.
pub fn select_primary(
    network: &Network,
    depths: &DepthTable,
    node: NodeIdx,
    candidates: &[EdgeIdx],
    incoming: Option<EdgeIdx>,
) -> Option<Selection> {
    let incoming = incoming.and_then(|e| network.edge(e));
    let mut ranked: Vec<Ranking> = candidates
        .iter()
        .filter_map(|&idx| network.edge(idx))
        .map(|edge| Ranking {
            edge: edge.idx,
            edge_id: edge.id.clone(),
            diameter_mm: edge.diameter_mm,
            depth: depths.depth_of(edge.from),
            created_at_ms: edge.created_at_ms,
            angle_delta_deg: angle_delta(network, node, incoming, edge),
        })
        .collect();
    ranked.sort_by(Ranking::cmp_priority);

    let primary = ranked.first()?.edge;
    Some(Selection {
        primary,
        reason: determine_reason(&ranked),
        ranked,
    })
}

fn determine_reason(ranked: &[Ranking]) -> SelectionReason {
    let [first, second, ..] = ranked else {
        return SelectionReason::SingleOutlet;
    };
    if first.diameter_mm > second.diameter_mm + DIAMETER_EPS {
        return SelectionReason::Diameter;
    }
    if (first.diameter_mm - second.diameter_mm).abs() <= DIAMETER_EPS {
        if first.depth > second.depth {
            return SelectionReason::Depth;
        }
        if first.depth == second.depth {
            if first.created_at_key() < second.created_at_key() {
                return SelectionReason::CreatedAt;
            }
            if (first.angle_delta_deg - second.angle_delta_deg).abs() > ANGLE_EPS {
                return SelectionReason::Angle;
            }
        }
    }
    SelectionReason::EdgeId
}

/// Angle, in degrees, between `incoming` and `candidate` as both leave
/// `node`. A straight run through `node` measures 180.
pub fn angle_delta(network: &Network, node: NodeIdx, incoming: Option<&Edge>, candidate: &Edge) -> Real {
    let Some(incoming) = incoming else {
        return NO_DIRECTION_DEG;
    };
    let toward_outlet = direction_away(network, node, incoming);
    let toward_inlet = direction_away(network, node, candidate);
    match (toward_outlet, toward_inlet) {
        (Some(a), Some(b)) => heading_delta_deg(a, b).unwrap_or(NO_DIRECTION_DEG),
        _ => NO_DIRECTION_DEG,
    }
}

/// Direction of `edge` as it leaves `node`.
///
/// Uses both endpoint coordinates when available, else the geometry segment
/// touching `node`.
fn direction_away(network: &Network, node: NodeIdx, edge: &Edge) -> Option<Vec2> {
    let (from, to) = edge.endpoints()?;
    let other = if from == node {
        to
    } else if to == node {
        from
    } else {
        return None;
    };
    if other == node {
        return None;
    }

    let here = network.node(node).and_then(|n| n.position);
    let there = network.node(other).and_then(|n| n.position);
    if let (Some(here), Some(there)) = (here, there) {
        return Some(here.vector_to(there));
    }

    let points = &edge.geometry;
    if points.len() < 2 {
        return None;
    }
    if from == node {
        Some(points[0].vector_to(points[1]))
    } else {
        let last = points.len() - 1;
        Some(points[last].vector_to(points[last - 1]))
    }
}
