//! In-memory ledger backend.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::job::{Job, JobUpdate};

use super::{check_transition, JobLedger, LedgerError};

/// Ledger backed by a `HashMap`. Records are lost when dropped.
#[derive(Default)]
pub struct InMemoryJobLedger {
    jobs: RwLock<HashMap<String, Job>>,
}

impl InMemoryJobLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.jobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobLedger for InMemoryJobLedger {
    fn create(&self, job_id: &str) -> Result<Job, LedgerError> {
        let mut jobs = self.jobs.write().map_err(LedgerError::database)?;
        if jobs.contains_key(job_id) {
            return Err(LedgerError::Conflict(job_id.to_string()));
        }
        let job = Job::pending(job_id);
        jobs.insert(job_id.to_string(), job.clone());
        Ok(job)
    }

    fn update(&self, job_id: &str, update: JobUpdate) -> Result<Job, LedgerError> {
        let mut jobs = self.jobs.write().map_err(LedgerError::database)?;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| LedgerError::NotFound(job_id.to_string()))?;
        check_transition(job, &update)?;
        update.apply_to(job);
        Ok(job.clone())
    }

    fn get(&self, job_id: &str) -> Result<Option<Job>, LedgerError> {
        let jobs = self.jobs.read().map_err(LedgerError::database)?;
        Ok(jobs.get(job_id).cloned())
    }
}
