//! Job lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mapping from alias to a URL, a filename or a download link.
///
/// Ordered so that iteration is deterministic (and lexicographic by alias).
pub type AliasMap = BTreeMap<String, String>;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created at submission, pipeline not started yet.
    Pending,
    /// Pipeline is running.
    Processing,
    /// External process succeeded, outputs are downloadable.
    Completed,
    /// Some stage failed; see the job's error.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// A job record as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Alias -> download URL. Only set once completed.
    pub output_files: Option<AliasMap>,
    /// Failure description. Only set once failed.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// A freshly submitted job.
    pub fn pending(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            output_files: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A status transition written by the orchestrator.
///
/// Overwrites the status and both optional fields of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdate {
    pub status: JobStatus,
    pub output_files: Option<AliasMap>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn processing() -> Self {
        Self {
            status: JobStatus::Processing,
            output_files: None,
            error: None,
        }
    }

    pub fn completed(output_files: AliasMap) -> Self {
        Self {
            status: JobStatus::Completed,
            output_files: Some(output_files),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            output_files: None,
            error: Some(error.into()),
        }
    }

    /// Checks the payload against the status it is written with.
    pub fn validate(&self) -> Result<(), String> {
        match self.status {
            JobStatus::Pending => Err("a job cannot be moved back to pending".to_string()),
            JobStatus::Processing => {
                if self.output_files.is_some() || self.error.is_some() {
                    Err("processing jobs carry neither outputs nor an error".to_string())
                } else {
                    Ok(())
                }
            }
            JobStatus::Completed => {
                if self.error.is_some() {
                    Err("completed jobs cannot carry an error".to_string())
                } else if self.output_files.is_none() {
                    Err("completed jobs must carry their output files".to_string())
                } else {
                    Ok(())
                }
            }
            JobStatus::Failed => {
                if self.output_files.is_some() {
                    Err("failed jobs cannot carry output files".to_string())
                } else if self.error.is_none() {
                    Err("failed jobs must carry an error".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Applies this update to a record.
    pub fn apply_to(self, job: &mut Job) {
        job.status = self.status;
        job.output_files = self.output_files;
        job.error = self.error;
        job.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let parsed: JobStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, JobStatus::Failed);
    }

    #[test]
    fn test_status_from_str_round_trips_display() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<JobStatus>().unwrap(), status);
        }
        assert!("queued".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_update_constructors_are_valid() {
        assert!(JobUpdate::processing().validate().is_ok());
        assert!(JobUpdate::completed(AliasMap::new()).validate().is_ok());
        assert!(JobUpdate::failed("boom").validate().is_ok());
    }

    #[test]
    fn test_update_rejects_mixed_payloads() {
        let mut update = JobUpdate::completed(AliasMap::new());
        update.error = Some("oops".to_string());
        assert!(update.validate().is_err());

        let mut update = JobUpdate::failed("boom");
        update.output_files = Some(AliasMap::new());
        assert!(update.validate().is_err());

        let update = JobUpdate {
            status: JobStatus::Pending,
            output_files: None,
            error: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_apply_overwrites_optional_fields() {
        let mut job = Job::pending("job-1");
        JobUpdate::failed("boom").apply_to(&mut job);
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("boom"));
        assert!(job.output_files.is_none());
        assert!(job.updated_at >= job.created_at);
    }
}
