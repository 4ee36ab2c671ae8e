//! pn-project: network snapshot files, branch catalog, authority responses.

pub mod authority;
pub mod catalog;
pub mod fingerprint;
pub mod names;
pub mod snapshot;

use std::path::Path;

pub use authority::{ApplySummary, AuthorityResponse, BranchUpdate, apply_authority_response};
pub use catalog::{BranchMeta, build_catalog, sync_catalog};
pub use fingerprint::{network_fingerprint, topology_fingerprint};
pub use names::BranchNames;
pub use snapshot::{GraphSnapshot, SNAPSHOT_VERSION, StyleMeta};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Unsupported snapshot format: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encodings of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> ProjectResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ProjectError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<GraphSnapshot> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: GraphSnapshot = serde_yaml::from_str(&content)?;
    Ok(snapshot)
}

pub fn save_yaml(path: &Path, snapshot: &GraphSnapshot) -> ProjectResult<()> {
    let content = serde_yaml::to_string(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<GraphSnapshot> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: GraphSnapshot = serde_json::from_str(&content)?;
    Ok(snapshot)
}

pub fn save_json(path: &Path, snapshot: &GraphSnapshot) -> ProjectResult<()> {
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a snapshot, picking the format from the extension.
pub fn load_path(path: &Path) -> ProjectResult<GraphSnapshot> {
    match Format::from_path(path)? {
        Format::Json => load_json(path),
        Format::Yaml => load_yaml(path),
    }
}

/// Save a snapshot, picking the format from the extension.
pub fn save_path(path: &Path, snapshot: &GraphSnapshot) -> ProjectResult<()> {
    match Format::from_path(path)? {
        Format::Json => save_json(path, snapshot),
        Format::Yaml => save_yaml(path, snapshot),
    }
}
