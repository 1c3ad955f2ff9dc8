// HTTP route handlers for the DevLab API

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use devlab_common::types::{Outcome, ProblemSummary, PublicProblem, Submission};
use devlab_judge::{CodeCommand, CodeRequest, SubmissionError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::language_config::LanguageOption;
use crate::metrics;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProblemsResponse {
    pub problems: Vec<ProblemSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub problem: PublicProblem,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageOption>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionsResponse {
    pub submissions: Vec<Submission>,
}

/// GET /api/health - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "ok": true })))
}

/// GET /api/languages - Language options for the editor
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: state.languages.languages().to_vec(),
    })
}

/// GET /api/problems - Problem summaries
pub async fn list_problems(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProblemsResponse>, ApiError> {
    let problems = state.service.problems().await?;

    Ok(Json(ProblemsResponse {
        problems: problems.iter().map(|p| p.summary()).collect(),
    }))
}

/// GET /api/problems/{problem_id} - Problem statement without test expectations
pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
) -> Result<Json<ProblemResponse>, ApiError> {
    let problem = state.service.problem(&problem_id).await?;

    Ok(Json(ProblemResponse {
        problem: problem.public_view(),
    }))
}

/// POST /api/submissions/run - Execute against one sample test
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CodeRequest>, JsonRejection>,
) -> Result<Json<Outcome>, ApiError> {
    let command = parse_command(&state, payload)?;

    let outcome = state.service.run(&command).await?;
    metrics::VERDICTS_TOTAL
        .with_label_values(&["run", outcome.verdict.as_str()])
        .inc();

    Ok(Json(outcome))
}

/// POST /api/submissions/submit - Grade against hidden tests and record the attempt
pub async fn submit_code(
    State(state): State<Arc<AppState>>,
    CallerIdentity(user_id): CallerIdentity,
    payload: Result<Json<CodeRequest>, JsonRejection>,
) -> Result<Json<Outcome>, ApiError> {
    let command = parse_command(&state, payload)?;

    let outcome = state.service.submit(&command, &user_id).await?;
    metrics::VERDICTS_TOTAL
        .with_label_values(&["submit", outcome.verdict.as_str()])
        .inc();

    info!(
        user_id = %user_id,
        problem_id = %command.problem_id,
        verdict = %outcome.verdict,
        "Submission graded"
    );

    Ok(Json(outcome))
}

/// GET /api/submissions/{problem_id} - Caller's attempts for a problem, newest first
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    CallerIdentity(user_id): CallerIdentity,
    Path(problem_id): Path<String>,
) -> Result<Json<SubmissionsResponse>, ApiError> {
    let submissions = state.service.history(&user_id, &problem_id).await?;

    Ok(Json(SubmissionsResponse { submissions }))
}

/// GET /metrics - Prometheus exposition
pub async fn export_metrics() -> impl IntoResponse {
    match metrics::render() {
        Ok((content_type, body)) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e).into_response(),
    }
}

fn parse_command(
    state: &AppState,
    payload: Result<Json<CodeRequest>, JsonRejection>,
) -> Result<CodeCommand, ApiError> {
    let Json(request) = payload.map_err(|e| SubmissionError::InvalidRequest {
        message: e.body_text(),
    })?;
    let command = request.validate()?;

    if state.languages.judge_id(&command.language) != Some(command.language_id) {
        debug!(
            language = %command.language,
            language_id = command.language_id,
            "Language not in registry; forwarding id as given"
        );
    }

    Ok(command)
}
