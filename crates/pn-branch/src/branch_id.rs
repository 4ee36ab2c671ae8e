//! Branch identifier minting.

use std::collections::{BTreeMap, HashMap};

/// Parent used when a child is requested for a blank parent id.
const ANONYMOUS_PARENT: &str = "BRANCH";

/// Trimmed `value`, or trimmed `fallback` when `value` is blank.
pub fn ensure_branch_id(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.trim().to_string()
    } else {
        value.to_string()
    }
}

/// Mints `PARENT:NNN` child ids with one counter per parent.
///
/// Lives for a single assignment run; a fresh generator restarts every
/// counter at `001`.
#[derive(Debug, Default)]
pub struct BranchIdGenerator {
    counters: HashMap<String, u32>,
    parents: BTreeMap<String, String>,
}

impl BranchIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next child of `parent`.
    pub fn child_of(&mut self, parent: &str) -> String {
        let parent = ensure_branch_id(parent, ANONYMOUS_PARENT);
        let counter = self.counters.entry(parent.clone()).or_insert(0);
        *counter += 1;
        let child = format!("{parent}:{:03}", *counter);
        self.parents.entry(child.clone()).or_insert(parent);
        child
    }

    /// Child id -> parent id for every id minted so far.
    pub fn parents(&self) -> &BTreeMap<String, String> {
        &self.parents
    }

    pub fn into_parents(self) -> BTreeMap<String, String> {
        self.parents
    }
}
