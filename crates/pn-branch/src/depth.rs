//! Longest-chain depth, memoized per run.
//!
//! Depth follows the traversal direction: from a node across each arriving
//! edge to that edge's `from` node. A node with no arriving edges has depth
//! 0; otherwise `1 + max(depth(next))`.

use pn_core::NodeIdx;
use pn_graph::Network;

/// Depth of every node, computed once.
#[derive(Debug, Clone, Default)]
pub struct DepthTable {
    depths: Vec<u32>,
}

struct Frame {
    node: NodeIdx,
    next: usize,
    best: Option<u32>,
}

impl Frame {
    fn enter(node: NodeIdx) -> Self {
        Self {
            node,
            next: 0,
            best: None,
        }
    }

    fn offer(&mut self, depth: u32) {
        self.best = Some(self.best.map_or(depth, |b| b.max(depth)));
    }
}

impl DepthTable {
    /// Compute depths for all nodes, entering them in node-list order.
    ///
    /// A node met again while it is still on the walk stack contributes 0
    /// for that occurrence, so cycles terminate.
    pub fn compute(network: &Network) -> Self {
        let count = network.nodes().len();
        let mut memo: Vec<Option<u32>> = vec![None; count];
        let mut on_stack = vec![false; count];

        for node in network.nodes() {
            resolve(network, node.idx, &mut memo, &mut on_stack);
        }

        Self {
            depths: memo.into_iter().map(Option::unwrap_or_default).collect(),
        }
    }

    /// Depth of `node`; 0 for unknown nodes.
    pub fn depth(&self, node: NodeIdx) -> u32 {
        self.depths.get(node.pos()).copied().unwrap_or(0)
    }

    /// Depth of an optional node; 0 when absent.
    pub fn depth_of(&self, node: Option<NodeIdx>) -> u32 {
        node.map_or(0, |n| self.depth(n))
    }
}

fn resolve(network: &Network, start: NodeIdx, memo: &mut [Option<u32>], on_stack: &mut [bool]) {
    if memo[start.pos()].is_some() {
        return;
    }
    on_stack[start.pos()] = true;
    let mut stack = vec![Frame::enter(start)];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let arriving = network.arriving_edges(frame.node);
        if let Some(&edge) = arriving.get(frame.next) {
            frame.next += 1;
            let Some(child) = network.edge(edge).and_then(|e| e.from) else {
                continue;
            };
            if let Some(depth) = memo[child.pos()] {
                frame.offer(depth);
            } else if on_stack[child.pos()] {
                frame.offer(0);
            } else {
                on_stack[child.pos()] = true;
                stack.push(Frame::enter(child));
            }
        } else {
            let node = frame.node;
            let depth = frame.best.map_or(0, |b| b + 1);
            stack.pop();
            on_stack[node.pos()] = false;
            memo[node.pos()] = Some(depth);
            if let Some(parent) = stack.last_mut() {
                parent.offer(depth);
            }
        }
    }
}
