//! Error types for the workspace module.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The job id cannot be used as a directory name.
    #[error("Invalid job id for workspace: '{job_id}'")]
    InvalidJobId { job_id: String },

    /// A file name inside a workspace contains path components.
    #[error("Invalid file name: '{name}'")]
    InvalidFileName { name: String },

    /// A root directory could not be made absolute.
    #[error("Failed to resolve workspace root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove directory {path}: {source}")]
    RemoveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
