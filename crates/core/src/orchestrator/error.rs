//! Error types for the orchestrator.

use thiserror::Error;

use crate::fetcher::FetchError;
use crate::job::RequestError;
use crate::ledger::LedgerError;
use crate::resolver::TemplateError;
use crate::runner::LaunchError;
use crate::workspace::WorkspaceError;

/// A job could not be accepted.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid request: {0}")]
    Invalid(#[from] RequestError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// The first failure of a job pipeline. Its `Display` text becomes the
/// job's recorded error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// The process ran and exited unsuccessfully. `message` is its captured
    /// stderr, or a description of the exit status when stderr was empty.
    #[error("{message}")]
    ProcessFailed {
        exit_code: Option<i32>,
        message: String,
    },

    #[error("Job crashed: {0}")]
    Panicked(String),
}

impl PipelineError {
    /// Stage label used in logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Workspace(_) => "workspace",
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Template(_) => "resolve",
            PipelineError::Launch(_) => "launch",
            PipelineError::ProcessFailed { .. } => "process",
            PipelineError::Panicked(_) => "panic",
        }
    }
}
