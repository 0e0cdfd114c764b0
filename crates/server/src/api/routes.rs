use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{downloads, handlers, jobs, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Versioned API; /commands paths are aliases kept for existing clients
    let api_routes = Router::new()
        .route("/run-ffmpeg", post(jobs::submit_job))
        .route("/commands", post(jobs::submit_job))
        .route("/jobs/{id}", get(jobs::get_job))
        .route("/commands/{id}", get(jobs::get_job))
        .route("/commands/{id}/files", delete(downloads::delete_job_files))
        .route("/downloads/{id}/{filename}", get(downloads::download_file));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
