//! Snapshot loading, saving and branch assignment.

use std::path::{Path, PathBuf};

use pn_branch::{BranchReport, compute_branches, write_back};
use pn_project::{GraphSnapshot, network_fingerprint, sync_catalog};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::options::AssignOptions;

/// What one assignment did to a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct AssignOutcome {
    /// Input file, when the snapshot came from one.
    pub source: Option<PathBuf>,
    /// File the result was written to, if any.
    pub written_to: Option<PathBuf>,
    /// Nodes and edges whose branch id changed.
    pub relabeled: usize,
    pub catalog_changed: bool,
    /// Registered names whose id is no longer produced.
    pub orphaned_names: Vec<String>,
    /// Edges left out of traversal for a missing or unknown endpoint.
    pub dropped_edges: Vec<String>,
    pub fingerprint: String,
    pub report: BranchReport,
}

/// Load a snapshot; the format follows the file extension.
pub fn load_snapshot(path: &Path) -> AppResult<GraphSnapshot> {
    if !path.exists() {
        return Err(AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(pn_project::load_path(path)?)
}

/// Save a snapshot; the format follows the file extension.
pub fn save_snapshot(path: &Path, snapshot: &GraphSnapshot) -> AppResult<()> {
    pn_project::save_path(path, snapshot)?;
    Ok(())
}

/// Assign branch ids in memory and refresh the branch catalog.
pub fn assign_snapshot(snapshot: &mut GraphSnapshot, options: &AssignOptions) -> AssignOutcome {
    let network = snapshot.network();
    let dropped_edges: Vec<String> = network
        .edges()
        .iter()
        .filter(|e| !e.is_indexed())
        .map(|e| e.id.clone())
        .collect();
    if !dropped_edges.is_empty() {
        warn!(
            count = dropped_edges.len(),
            first = %dropped_edges[0],
            "edges with a missing or unknown endpoint are labeled by fallback only"
        );
    }

    let before: Vec<String> = labels(snapshot);
    let assignment = compute_branches(&network);
    write_back(&network, &assignment, &mut snapshot.nodes, &mut snapshot.edges);
    let relabeled = before
        .iter()
        .zip(labels(snapshot))
        .filter(|(old, new)| old.trim() != new.trim())
        .count();

    let report = assignment.into_report();
    let catalog_changed = sync_catalog(snapshot, &report);
    let orphaned_names = snapshot
        .names()
        .orphaned(&snapshot.used_branch_ids())
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !orphaned_names.is_empty() {
        warn!(count = orphaned_names.len(), "branch names keyed by ids no longer in use");
    }
    if options.stamp {
        snapshot.generated_at = Some(chrono::Utc::now().to_rfc3339());
    }

    info!(
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        roots = report.roots.len(),
        branches = report.parents.len() + report.roots.len(),
        relabeled,
        "assigned branch ids"
    );

    AssignOutcome {
        source: None,
        written_to: None,
        relabeled,
        catalog_changed,
        orphaned_names,
        dropped_edges,
        fingerprint: network_fingerprint(&network),
        report,
    }
}

fn labels(snapshot: &GraphSnapshot) -> Vec<String> {
    snapshot
        .nodes
        .iter()
        .map(|n| n.branch_id.clone())
        .chain(snapshot.edges.iter().map(|e| e.branch_id.clone()))
        .collect()
}

/// Load, assign and (per `options`) write one file.
pub fn assign_file(path: &Path, options: &AssignOptions) -> AppResult<(GraphSnapshot, AssignOutcome)> {
    let mut snapshot = load_snapshot(path)?;
    let mut outcome = assign_snapshot(&mut snapshot, options);
    outcome.source = Some(path.to_path_buf());
    if let Some(target) = options.target_for(path) {
        save_snapshot(&target, &snapshot)?;
        info!(path = %target.display(), "wrote snapshot");
        outcome.written_to = Some(target);
    }
    Ok((snapshot, outcome))
}

/// Assign several files in parallel. Results keep the input order.
///
/// Runs share nothing, so one failing file does not affect the others.
pub fn assign_batch(paths: &[PathBuf], options: &AssignOptions) -> AppResult<Vec<AppResult<AssignOutcome>>> {
    options.validate(paths.len())?;
    Ok(paths
        .par_iter()
        .map(|path| assign_file(path, options).map(|(_, outcome)| outcome))
        .collect())
}

/// Assign branch ids to independent in-memory snapshots in parallel.
pub fn assign_all(snapshots: &mut [GraphSnapshot], options: &AssignOptions) -> Vec<AssignOutcome> {
    snapshots
        .par_iter_mut()
        .map(|snapshot| assign_snapshot(snapshot, options))
        .collect()
}
