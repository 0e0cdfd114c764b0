//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the job orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of pipelines running at once.
    /// Unset means every submitted job starts immediately.
    /// Jobs waiting for a slot stay `pending`.
    #[serde(default)]
    pub max_concurrent_jobs: Option<usize>,
}
