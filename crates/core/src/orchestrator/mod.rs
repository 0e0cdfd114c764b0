//! Job orchestrator: drives each submitted job through its pipeline.
//!
//! Every job follows `pending -> processing -> {completed | failed}`:
//!
//! 1. **Submission** validates the request, records a `pending` row and
//!    spawns the pipeline. The caller gets the id back immediately.
//! 2. **Pipeline** allocates the workspace, fetches inputs, resolves the
//!    command and runs it, strictly in that order.
//! 3. **Finalization** writes `completed` with download links, or `failed`
//!    with the error text of the first stage that failed.
//!
//! Each pipeline runs in its own task under a supervisor task that records a
//! panic as a failure, so no job is left non-terminal and no job can affect
//! another.
//!
//! # Example
//!
//! ```ignore
//! let orchestrator = JobOrchestrator::new(
//!     &config.orchestrator,
//!     ledger,
//!     Arc::new(WorkspaceManager::new(&config.workspace)?),
//!     Arc::new(HttpFetcher::new(&config.fetcher)?),
//!     Arc::new(CommandResolver::new(config.resolver.clone())),
//!     Arc::new(TokioProcessRunner::new(config.runner.clone())),
//! );
//!
//! let handle = orchestrator.submit(request, "http://localhost:8080")?;
//! println!("submitted {}", handle.id());
//! ```

mod config;
mod error;
mod runner;

pub use config::OrchestratorConfig;
pub use error::{PipelineError, SubmitError};
pub use runner::{download_url, JobHandle, JobOrchestrator};
