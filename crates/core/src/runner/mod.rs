//! Process runner: executes resolved commands as external processes.
//!
//! Commands are launched directly, never through a shell, so arguments are
//! passed exactly as resolved. Both output streams are captured up to a
//! configurable size; the remainder is drained and dropped.

mod config;
mod error;
mod process;
mod traits;
mod types;

pub use config::RunnerConfig;
pub use error::LaunchError;
pub use process::TokioProcessRunner;
pub use traits::ProcessRunner;
pub use types::ProcessResult;
