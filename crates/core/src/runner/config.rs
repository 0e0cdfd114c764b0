//! Configuration for the process runner.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Bytes kept per output stream. Further output is discarded.
    #[serde(default = "default_max_captured_bytes")]
    pub max_captured_bytes: usize,
}

fn default_max_captured_bytes() -> usize {
    1024 * 1024
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_captured_bytes: default_max_captured_bytes(),
        }
    }
}
