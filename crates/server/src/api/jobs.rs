//! Job submission and status handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use ffjobs_core::{AliasMap, Job, JobRequest, JobStatus, ServerConfig, SubmitError};

use super::error::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for an accepted job
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub command_id: String,
}

/// Job status as reported to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponse {
    pub command_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_files: Option<AliasMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            command_id: job.id,
            status: job.status,
            output_files: job.output_files,
            error: job.error,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Base URL for download links of a job submitted with `headers`.
///
/// The configured public URL wins; otherwise the scheme comes from
/// `X-Forwarded-Proto` (default `http`) and the authority from `Host`.
pub fn request_base_url(server: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(base) = &server.public_base_url {
        return base.trim_end_matches('/').to_string();
    }

    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost");

    format!("{}://{}", proto, host)
}

// ============================================================================
// Handlers
// ============================================================================

/// Accept a job and start it in the background
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<JobRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let base_url = request_base_url(&state.config().server, &headers);

    match state.orchestrator().submit(request, base_url) {
        Ok(handle) => Ok(Json(SubmitResponse {
            command_id: handle.id().to_string(),
        })),
        Err(SubmitError::Invalid(e)) => Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            e.to_string(),
        )),
        Err(e @ SubmitError::Ledger(_)) => {
            error!(error = %e, "Failed to record submitted job");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Get a job's status by ID
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    match state.orchestrator().job(&id) {
        Ok(Some(job)) => Ok(Json(JobResponse::from(job))),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Job not found: {}", id),
        )),
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
