//! Human-readable branch names keyed by branch id.

use std::collections::{BTreeMap, BTreeSet};

/// Read-only view over `style_meta.branch_names_by_id`.
#[derive(Debug, Clone, Copy)]
pub struct BranchNames<'a> {
    by_id: &'a BTreeMap<String, String>,
}

impl<'a> BranchNames<'a> {
    pub fn new(by_id: &'a BTreeMap<String, String>) -> Self {
        Self { by_id }
    }

    /// Registered, non-blank name of `id`.
    pub fn name(&self, id: &str) -> Option<&'a str> {
        self.by_id
            .get(id.trim())
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }

    /// Registered name, or the id itself.
    pub fn display_name<'b>(&self, id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.name(id).unwrap_or(id)
    }

    /// Registered ids that no node or edge carries any more.
    ///
    /// A non-empty result after a recompute means names were keyed by ids
    /// the algorithm no longer produces.
    pub fn orphaned(&self, used: &BTreeSet<String>) -> Vec<&'a str> {
        self.by_id
            .keys()
            .filter(|id| !used.contains(id.trim()))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
