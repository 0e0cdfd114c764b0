//! Error types for the job ledger.

use thiserror::Error;

use crate::job::JobStatus;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job already exists: {0}")]
    Conflict(String),

    #[error("Cannot move job {job_id} from {from} to {to}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Invalid update for job {job_id}: {reason}")]
    InvalidUpdate { job_id: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    pub(crate) fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}
