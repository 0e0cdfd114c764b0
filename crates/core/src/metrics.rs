//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Job lifecycle (submissions, outcomes, in-flight pipelines)
//! - Input fetching (bytes written to staging)
//! - External process runs (exit outcomes)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Job lifecycle
// =============================================================================

/// Jobs accepted at submission.
pub static JOBS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("ffjobs_jobs_submitted_total", "Total jobs accepted").unwrap()
});

/// Jobs that reached `completed`.
pub static JOBS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ffjobs_jobs_completed_total",
        "Total jobs completed successfully",
    )
    .unwrap()
});

/// Jobs that reached `failed`, by the stage that failed.
pub static JOBS_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ffjobs_jobs_failed_total", "Total jobs failed"),
        &["stage"], // "workspace", "fetch", "resolve", "launch", "process", "panic"
    )
    .unwrap()
});

/// Pipelines currently running (admitted and not yet terminal).
pub static JOBS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("ffjobs_jobs_in_flight", "Job pipelines currently running").unwrap()
});

/// Pipeline duration in seconds, by outcome.
pub static JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ffjobs_job_duration_seconds",
            "Duration of a job pipeline from start to terminal state",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0]),
        &["result"], // "completed", "failed"
    )
    .unwrap()
});

// =============================================================================
// Fetching
// =============================================================================

/// Bytes of input media written to staging directories.
pub static INPUT_BYTES_FETCHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ffjobs_input_bytes_fetched_total",
        "Total bytes of input media fetched",
    )
    .unwrap()
});

// =============================================================================
// Process execution
// =============================================================================

/// External process runs by outcome.
pub static PROCESS_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ffjobs_process_runs_total", "Total external process runs"),
        &["result"], // "success", "nonzero_exit", "launch_error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_COMPLETED.clone()),
        Box::new(JOBS_FAILED.clone()),
        Box::new(JOBS_IN_FLIGHT.clone()),
        Box::new(JOB_DURATION.clone()),
        Box::new(INPUT_BYTES_FETCHED.clone()),
        Box::new(PROCESS_RUNS.clone()),
    ]
}
