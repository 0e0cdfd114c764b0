//! Trait definition for ledger backends.

use crate::job::{Job, JobUpdate};

use super::LedgerError;

/// Storage for job records.
///
/// Each call is atomic with respect to the single row it touches.
pub trait JobLedger: Send + Sync {
    /// Inserts a `pending` record for a new job.
    fn create(&self, job_id: &str) -> Result<Job, LedgerError>;

    /// Overwrites the status, outputs and error of an existing record.
    fn update(&self, job_id: &str, update: JobUpdate) -> Result<Job, LedgerError>;

    /// Looks up a record by id.
    fn get(&self, job_id: &str) -> Result<Option<Job>, LedgerError>;
}
