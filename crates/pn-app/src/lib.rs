//! Shared application service layer for pipe-network branch tooling.
//!
//! Centralizes what the CLI does with snapshot files: assigning branch ids
//! (one file or a parallel batch), explaining decisions, checking health,
//! listing colours and applying authority responses.

pub mod authority_service;
pub mod error;
pub mod options;
pub mod query;
pub mod snapshot_service;

// Re-export key types for convenience
pub use authority_service::{apply_response_file, load_response};
pub use error::{AppError, AppResult};
pub use options::AssignOptions;
pub use query::{BranchColor, CheckReport, Explanation, NodeExplanation, branch_colors, check, explain, lineage};
pub use snapshot_service::{
    AssignOutcome, assign_all, assign_batch, assign_file, assign_snapshot, load_snapshot, save_snapshot,
};
