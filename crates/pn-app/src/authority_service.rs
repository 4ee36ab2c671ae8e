//! Applying a server's recomputed branch ids to a snapshot file.

use std::path::Path;

use pn_project::{ApplySummary, AuthorityResponse, apply_authority_response, sync_catalog};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::snapshot_service::{load_snapshot, save_snapshot};

pub fn load_response(path: &Path) -> AppResult<AuthorityResponse> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| AppError::Response(e.to_string()))
}

/// Apply the response at `response_path` to the snapshot at
/// `snapshot_path`, writing to `output` or back over the snapshot.
pub fn apply_response_file(
    snapshot_path: &Path,
    response_path: &Path,
    output: Option<&Path>,
) -> AppResult<ApplySummary> {
    let mut snapshot = load_snapshot(snapshot_path)?;
    let response = load_response(response_path)?;

    let summary = apply_authority_response(&mut snapshot, response);
    // Lineage is unknown for server-minted ids; keep whatever is stored.
    sync_catalog(&mut snapshot, &pn_branch::BranchReport::default());

    let target = output.unwrap_or(snapshot_path);
    save_snapshot(target, &snapshot)?;
    info!(
        path = %target.display(),
        nodes = summary.nodes_updated,
        edges = summary.edges_updated,
        conflicts = summary.conflicts.len(),
        "applied authority response"
    );
    Ok(summary)
}
