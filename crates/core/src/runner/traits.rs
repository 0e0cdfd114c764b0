//! Trait definitions for the process runner.

use async_trait::async_trait;

use super::error::LaunchError;
use super::types::ProcessResult;

/// Executes an argument vector as an external process.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Runs `args[0]` with `args[1..]` and waits for it to exit.
    ///
    /// A non-zero exit is reported through [`ProcessResult::exit_code`],
    /// not as an error.
    async fn run(&self, args: &[String]) -> Result<ProcessResult, LaunchError>;
}
