//! Configuration for workspace roots.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Root under which per-job input staging directories are created.
    #[serde(default = "default_staging_root")]
    pub staging_root: PathBuf,

    /// Root under which per-job output directories are created.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

fn default_staging_root() -> PathBuf {
    PathBuf::from("temp_downloads")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("temp_outputs")
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            staging_root: default_staging_root(),
            output_root: default_output_root(),
        }
    }
}

impl WorkspaceConfig {
    pub fn with_roots(staging_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            output_root: output_root.into(),
        }
    }
}
