//! Branch propagation from sources, with a fallback pass for whatever no
//! source reaches.
//!
//! The walk starts at each source and moves against edge direction: from a
//! node across each arriving edge to that edge's `from` node. It runs on an
//! explicit task stack that reproduces depth-first order: a split child is
//! minted only when its task is popped, after the primary's whole upstream
//! run has been labeled.

use std::collections::HashSet;

use pn_core::{EdgeIdx, NodeIdx};
use pn_graph::{Edge, Network};
use tracing::{debug, trace};

use crate::branch_id::{BranchIdGenerator, ensure_branch_id};
use crate::depth::DepthTable;
use crate::report::{BranchAssignment, BranchReport, RootSeed, SplitBranch, SplitDecision};
use crate::selector::{cmp_edge_ids, select_primary};
use crate::separator::is_separator;

/// Prefix of the base branch id of a source that carries none.
pub const ROOT_PREFIX: &str = "GENERAL-";

enum Task {
    /// Label the edge with `branch` and continue at its upstream node.
    Edge { edge: EdgeIdx, branch: String },
    /// Mint a child of `parent`, then label the edge with it.
    Split {
        edge: EdgeIdx,
        parent: String,
        decision: usize,
    },
}

/// Per-run state. Nothing here outlives one call to [`TraversalContext::run`].
pub struct TraversalContext<'n> {
    network: &'n Network,
    depths: DepthTable,
    ids: BranchIdGenerator,
    node_branch: Vec<Option<String>>,
    edge_branch: Vec<Option<String>>,
    seen_nodes: HashSet<(NodeIdx, String)>,
    seen_edges: HashSet<(EdgeIdx, String)>,
    stack: Vec<Task>,
    report: BranchReport,
}

impl<'n> TraversalContext<'n> {
    pub fn new(network: &'n Network) -> Self {
        Self {
            network,
            depths: DepthTable::compute(network),
            ids: BranchIdGenerator::new(),
            node_branch: vec![None; network.nodes().len()],
            edge_branch: vec![None; network.edges().len()],
            seen_nodes: HashSet::new(),
            seen_edges: HashSet::new(),
            stack: Vec::new(),
            report: BranchReport::default(),
        }
    }

    /// Label every node and edge.
    pub fn run(mut self) -> BranchAssignment {
        self.seed_roots();
        self.fallback();
        self.finish()
    }

    fn seed_roots(&mut self) {
        let network = self.network;
        for root in network.sources() {
            let Some(node) = network.node(root) else {
                continue;
            };
            let base = ensure_branch_id(&node.carried_branch, &format!("{ROOT_PREFIX}{}", node.id));
            trace!(root = %node.id, branch = %base, "seeding branch tree");
            self.report.roots.push(RootSeed {
                node: node.id.clone(),
                branch: base.clone(),
            });
            self.seen_nodes.insert((root, base.clone()));
            self.set_node(root, &base);
            // Sources always rank their outlets, whatever their degree.
            self.branch_out(root, &base, None);
            self.drain();
        }
    }

    fn assign_from_node(&mut self, node: NodeIdx, branch: &str, incoming: Option<EdgeIdx>) {
        if !self.seen_nodes.insert((node, branch.to_string())) {
            return;
        }
        self.set_node(node, branch);

        let network = self.network;
        let candidates = network.arriving_edges(node);
        if candidates.is_empty() {
            return;
        }

        if is_separator(network, node) {
            self.branch_out(node, branch, incoming);
            return;
        }

        let mut ordered: Vec<&Edge> = candidates.iter().filter_map(|&e| network.edge(e)).collect();
        ordered.sort_by(|a, b| cmp_edge_ids(&a.id, &b.id).then(a.idx.cmp(&b.idx)));
        for edge in ordered.into_iter().rev() {
            self.stack.push(Task::Edge {
                edge: edge.idx,
                branch: branch.to_string(),
            });
        }
    }

    /// Rank the node's candidates: the primary keeps `branch`, every other
    /// candidate is queued for a child id.
    fn branch_out(&mut self, node: NodeIdx, branch: &str, incoming: Option<EdgeIdx>) {
        let network = self.network;
        let candidates = network.arriving_edges(node);
        let Some(selection) = select_primary(network, &self.depths, node, candidates, incoming) else {
            return;
        };

        let node_id = network.node(node).map(|n| n.id.clone()).unwrap_or_default();
        let primary_id = selection
            .ranked
            .first()
            .map(|r| r.edge_id.clone())
            .unwrap_or_default();
        debug!(
            node = %node_id,
            branch,
            primary = %primary_id,
            reason = %selection.reason,
            splits = selection.splits().count(),
            "ranked candidates"
        );

        let decision = self.report.decisions.len();
        for split in selection.splits().rev() {
            self.stack.push(Task::Split {
                edge: split.edge,
                parent: branch.to_string(),
                decision,
            });
        }
        self.stack.push(Task::Edge {
            edge: selection.primary,
            branch: branch.to_string(),
        });

        self.report.decisions.push(SplitDecision {
            node: node_id,
            branch: branch.to_string(),
            incoming: incoming.and_then(|e| network.edge(e)).map(|e| e.id.clone()),
            primary: primary_id,
            reason: selection.reason,
            splits: Vec::new(),
            rankings: selection.ranked,
        });
    }

    fn assign_edge(&mut self, edge: EdgeIdx, branch: String) {
        if !self.seen_edges.insert((edge, branch.clone())) {
            return;
        }
        let upstream = self.network.edge(edge).and_then(Edge::endpoints).map(|(from, _)| from);
        if let Some(slot) = self.edge_branch.get_mut(edge.pos()) {
            *slot = Some(branch.clone());
        }
        if let Some(from) = upstream {
            self.assign_from_node(from, &branch, Some(edge));
        }
    }

    fn drain(&mut self) {
        while let Some(task) = self.stack.pop() {
            match task {
                Task::Edge { edge, branch } => self.assign_edge(edge, branch),
                Task::Split {
                    edge,
                    parent,
                    decision,
                } => {
                    let child = self.ids.child_of(&parent);
                    if let (Some(d), Some(e)) = (
                        self.report.decisions.get_mut(decision),
                        self.network.edge(edge),
                    ) {
                        d.splits.push(SplitBranch {
                            edge: e.id.clone(),
                            branch: child.clone(),
                        });
                    }
                    self.assign_edge(edge, child);
                }
            }
        }
    }

    /// Label everything no source reached.
    fn fallback(&mut self) {
        let network = self.network;
        for edge in network.edges() {
            if self.edge_branch[edge.idx.pos()].is_some() {
                continue;
            }
            let branch = ensure_branch_id(&edge.carried_branch, &edge.id);
            trace!(edge = %edge.id, branch = %branch, "fallback edge");
            self.report.fallback_edges.push(edge.id.clone());
            if let Some(to) = edge.to {
                if self.node_branch[to.pos()].is_none() {
                    self.set_node(to, &branch);
                }
            }
            self.stack.push(Task::Edge {
                edge: edge.idx,
                branch,
            });
            self.drain();
        }

        for node in network.nodes() {
            if self.node_branch[node.idx.pos()].is_some() {
                continue;
            }
            let own = if node.id.is_empty() {
                format!("NODE-{}", node.idx.pos() + 1)
            } else {
                node.id.clone()
            };
            let branch = ensure_branch_id(&node.carried_branch, &own);
            self.report.fallback_nodes.push(node.id.clone());
            self.set_node(node.idx, &branch);
        }
    }

    fn set_node(&mut self, node: NodeIdx, branch: &str) {
        if let Some(slot) = self.node_branch.get_mut(node.pos()) {
            *slot = Some(branch.to_string());
        }
    }

    fn finish(self) -> BranchAssignment {
        let network = self.network;
        let edge_branches = self
            .edge_branch
            .into_iter()
            .zip(network.edges())
            .map(|(branch, edge)| branch.unwrap_or_else(|| edge.id.clone()))
            .collect();
        let node_branches = self
            .node_branch
            .into_iter()
            .zip(network.nodes())
            .map(|(branch, node)| branch.unwrap_or_else(|| node.id.clone()))
            .collect();

        let mut report = self.report;
        report.parents = self.ids.into_parents();

        debug!(
            nodes = network.nodes().len(),
            edges = network.edges().len(),
            roots = report.roots.len(),
            decisions = report.decisions.len(),
            fallback_edges = report.fallback_edges.len(),
            "branch assignment finished"
        );

        BranchAssignment {
            node_branches,
            edge_branches,
            report,
        }
    }
}
