//! SQLite-backed ledger.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::job::{AliasMap, Job, JobStatus, JobUpdate};

use super::{check_transition, JobLedger, LedgerError};

const SELECT_JOB: &str =
    "SELECT job_id, status, output_files, error, created_at, updated_at FROM jobs WHERE job_id = ?";

/// Ledger stored in a single SQLite table.
pub struct SqliteJobLedger {
    conn: Mutex<Connection>,
}

impl SqliteJobLedger {
    /// Opens (or creates) the database file and its schema.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path).map_err(LedgerError::database)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory().map_err(LedgerError::database)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LedgerError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                job_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                output_files TEXT,
                error TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
            "#,
        )
        .map_err(LedgerError::database)
    }

    fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
        let id: String = row.get(0)?;
        let status_str: String = row.get(1)?;
        let output_files_json: Option<String> = row.get(2)?;
        let error: Option<String> = row.get(3)?;
        let created_at_str: String = row.get(4)?;
        let updated_at_str: String = row.get(5)?;

        let status: JobStatus = status_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;

        let output_files = output_files_json
            .map(|json| serde_json::from_str::<AliasMap>(&json))
            .transpose()
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
            })?;

        Ok(Job {
            id,
            status,
            output_files,
            error,
            created_at: parse_timestamp(4, &created_at_str)?,
            updated_at: parse_timestamp(5, &updated_at_str)?,
        })
    }

    fn fetch(conn: &Connection, job_id: &str) -> Result<Option<Job>, LedgerError> {
        conn.query_row(SELECT_JOB, params![job_id], Self::row_to_job)
            .optional()
            .map_err(LedgerError::database)
    }
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, e.into())
        })
}

impl JobLedger for SqliteJobLedger {
    fn create(&self, job_id: &str) -> Result<Job, LedgerError> {
        let conn = self.conn.lock().map_err(LedgerError::database)?;
        let job = Job::pending(job_id);

        let inserted = conn.execute(
            "INSERT INTO jobs (job_id, status, output_files, error, created_at, updated_at) VALUES (?, ?, NULL, NULL, ?, ?)",
            params![
                job.id,
                job.status.as_str(),
                job.created_at.to_rfc3339(),
                job.updated_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => Ok(job),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(LedgerError::Conflict(job_id.to_string()))
            }
            Err(e) => Err(LedgerError::database(e)),
        }
    }

    fn update(&self, job_id: &str, update: JobUpdate) -> Result<Job, LedgerError> {
        let conn = self.conn.lock().map_err(LedgerError::database)?;

        let mut job =
            Self::fetch(&conn, job_id)?.ok_or_else(|| LedgerError::NotFound(job_id.to_string()))?;
        check_transition(&job, &update)?;
        update.apply_to(&mut job);

        let output_files_json = job
            .output_files
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(LedgerError::database)?;

        conn.execute(
            "UPDATE jobs SET status = ?, output_files = ?, error = ?, updated_at = ? WHERE job_id = ?",
            params![
                job.status.as_str(),
                output_files_json,
                job.error,
                job.updated_at.to_rfc3339(),
                job_id,
            ],
        )
        .map_err(LedgerError::database)?;

        Ok(job)
    }

    fn get(&self, job_id: &str) -> Result<Option<Job>, LedgerError> {
        let conn = self.conn.lock().map_err(LedgerError::database)?;
        Self::fetch(&conn, job_id)
    }
}
