use axum::{http::header, response::IntoResponse, Json};
use serde::Serialize;

use crate::metrics::encode_metrics;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "FFmpeg job server is running. Use POST /v1/run-ffmpeg to start a job."
            .to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
