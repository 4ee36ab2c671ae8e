//! Compact adjacency storage.
//!
//! Each list is stored as one flat edge array plus per-node offsets, the
//! same layout a solver would use for node/port incidence.

use pn_core::{EdgeIdx, NodeIdx};

/// Node -> edges incidence in offset/flat form.
///
/// Node `i`'s edges are `flat[offsets[i]..offsets[i + 1]]`, in ascending
/// edge index order (i.e. input order).
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    offsets: Vec<usize>,
    flat: Vec<EdgeIdx>,
}

impl Adjacency {
    /// Build from `(node, edge)` pairs.
    pub fn build(node_count: usize, pairs: impl IntoIterator<Item = (NodeIdx, EdgeIdx)>) -> Self {
        let mut per_node: Vec<Vec<EdgeIdx>> = vec![Vec::new(); node_count];
        for (node, edge) in pairs {
            if let Some(list) = per_node.get_mut(node.pos()) {
                list.push(edge);
            }
        }

        // Sort each node's list for determinism
        for list in &mut per_node {
            list.sort();
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for list in per_node {
            flat.extend_from_slice(&list);
            offsets.push(flat.len());
        }

        Self { offsets, flat }
    }

    /// Edges attached to `node` (empty for unknown nodes).
    pub fn of(&self, node: NodeIdx) -> &[EdgeIdx] {
        let idx = node.pos();
        if idx + 1 >= self.offsets.len() {
            return &[];
        }
        &self.flat[self.offsets[idx]..self.offsets[idx + 1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::Id;

    #[test]
    fn adjacency_groups_and_sorts() {
        let n0 = Id::from_index(0);
        let n1 = Id::from_index(1);
        let e = |i| Id::from_index(i);
        let adj = Adjacency::build(3, [(n1, e(4)), (n0, e(2)), (n1, e(1))]);

        assert_eq!(adj.of(n0), &[e(2)]);
        assert_eq!(adj.of(n1), &[e(1), e(4)]);
        assert!(adj.of(Id::from_index(2)).is_empty());
    }

    #[test]
    fn adjacency_out_of_range() {
        let adj = Adjacency::build(1, [(Id::from_index(7), Id::from_index(0))]);
        assert!(adj.of(Id::from_index(0)).is_empty());
        assert!(adj.of(Id::from_index(7)).is_empty());

        let empty = Adjacency::default();
        assert!(empty.of(Id::from_index(0)).is_empty());
    }
}
