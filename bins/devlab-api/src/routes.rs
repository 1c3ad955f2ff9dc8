// Route table for the DevLab API

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::AppState;

/// Request bodies above this size are rejected before reaching a handler
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/languages", get(handlers::list_languages))
        .route("/api/problems", get(handlers::list_problems))
        .route("/api/problems/:problem_id", get(handlers::get_problem))
        .route("/api/submissions/run", post(handlers::run_code))
        .route("/api/submissions/submit", post(handlers::submit_code))
        .route("/api/submissions/:problem_id", get(handlers::list_submissions))
        .route("/metrics", get(handlers::export_metrics))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
