//! Job ledger: durable record of job identity and lifecycle state.
//!
//! The orchestrator writes through the [`JobLedger`] trait; HTTP handlers
//! read through it. Two backends are provided:
//!
//! - [`SqliteJobLedger`] persists rows in a `jobs` table.
//! - [`InMemoryJobLedger`] keeps rows in a map, for tests and embedding.
//!
//! Every write is checked against the lifecycle
//! `pending -> processing -> {completed | failed}` before it is stored.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::LedgerError;
pub use memory::InMemoryJobLedger;
pub use sqlite::SqliteJobLedger;
pub use traits::JobLedger;

use crate::job::{Job, JobUpdate};

/// Rejects updates that would leave a terminal state or break the payload
/// rules of the target status.
pub(crate) fn check_transition(current: &Job, update: &JobUpdate) -> Result<(), LedgerError> {
    if current.status.is_terminal() || update.status == crate::job::JobStatus::Pending {
        return Err(LedgerError::InvalidTransition {
            job_id: current.id.clone(),
            from: current.status,
            to: update.status,
        });
    }
    update.validate().map_err(|reason| LedgerError::InvalidUpdate {
        job_id: current.id.clone(),
        reason,
    })
}
