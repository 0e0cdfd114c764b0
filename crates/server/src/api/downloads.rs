//! Artifact download and cleanup handlers.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::warn;

use super::error::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteFilesResponse {
    pub status: String,
}

/// Stream a produced file from a job's output directory
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path((job_id, filename)): Path<(String, String)>,
    request: Request,
) -> Response {
    let not_found = || api_error(StatusCode::NOT_FOUND, "File not found").into_response();

    let Ok(path) = state
        .orchestrator()
        .workspaces()
        .output_file(&job_id, &filename)
    else {
        return not_found();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return not_found(),
    }

    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}

/// Remove a job's staging and output directories
pub async fn delete_job_files(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteFilesResponse>, ApiError> {
    let orchestrator = state.orchestrator();

    match orchestrator.job(&id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(api_error(
                StatusCode::NOT_FOUND,
                format!("Job not found: {}", id),
            ))
        }
        Err(e) => return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }

    if let Err(e) = orchestrator.workspaces().release(&id).await {
        warn!(job_id = %id, error = %e, "Failed to delete job files");
    }

    Ok(Json(DeleteFilesResponse {
        status: "deleted".to_string(),
    }))
}
