// Mapping of pipeline failures onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use devlab_judge::SubmissionError;
use tracing::{error, warn};

use crate::metrics;

#[derive(Debug)]
pub enum ApiError {
    Submission(SubmissionError),
    Unauthorized,
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        ApiError::Submission(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Submission(err) => match err {
                SubmissionError::InvalidRequest { .. } | SubmissionError::NoTestCases { .. } => {
                    StatusCode::BAD_REQUEST
                }
                SubmissionError::ProblemNotFound { .. } => StatusCode::NOT_FOUND,
                SubmissionError::UpstreamUnavailable { .. } => StatusCode::GATEWAY_TIMEOUT,
                SubmissionError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
                SubmissionError::PersistenceFailure { .. }
                | SubmissionError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Submission(err) => err.kind(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Submission(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = self.message();

        metrics::REQUEST_ERRORS_TOTAL.with_label_values(&[kind]).inc();
        if status.is_server_error() {
            error!(kind, status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(kind, status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                SubmissionError::InvalidRequest { message: String::new() },
                StatusCode::BAD_REQUEST,
            ),
            (
                SubmissionError::NoTestCases { problem_id: "p".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (
                SubmissionError::ProblemNotFound { problem_id: "p".to_string() },
                StatusCode::NOT_FOUND,
            ),
            (
                SubmissionError::UpstreamUnavailable { message: String::new() },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                SubmissionError::UpstreamError { message: String::new() },
                StatusCode::BAD_GATEWAY,
            ),
            (
                SubmissionError::PersistenceFailure { message: String::new() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
