//! Error types for the submission pipeline.

/// Failures talking to the remote judge service.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// The service could not be reached, or did not answer within the timeout.
    #[error("judge service unavailable: {message}")]
    Unavailable { message: String },

    /// The service answered with a non-success status or an unreadable body.
    #[error("judge service error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// The client could not be built from its configuration.
    #[error("invalid judge configuration: {message}")]
    Config { message: String },
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Upstream {
                status: err.status().map(|s| s.as_u16()),
                message: format!("unreadable response: {}", err),
            }
        } else {
            Self::Unavailable {
                message: err.to_string(),
            }
        }
    }
}

/// Failures of the persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {message}")]
    Backend { message: String },
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend {
            message: err.to_string(),
        }
    }
}

/// Every way a run or submit call can fail. None of these are retried here.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("problem not found: {problem_id}")]
    ProblemNotFound { problem_id: String },

    #[error("no test cases configured for problem {problem_id}")]
    NoTestCases { problem_id: String },

    #[error("judge service unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("judge service error: {message}")]
    UpstreamError { message: String },

    /// Grading may have finished, but the record was not written.
    #[error("submission could not be recorded: {message}")]
    PersistenceFailure { message: String },

    #[error("problem store unavailable: {message}")]
    StorageUnavailable { message: String },
}

impl SubmissionError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::ProblemNotFound { .. } => "problem_not_found",
            Self::NoTestCases { .. } => "no_test_cases",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::UpstreamError { .. } => "upstream_error",
            Self::PersistenceFailure { .. } => "persistence_failure",
            Self::StorageUnavailable { .. } => "storage_unavailable",
        }
    }
}

impl From<JudgeError> for SubmissionError {
    fn from(err: JudgeError) -> Self {
        match err {
            JudgeError::Unavailable { message } => Self::UpstreamUnavailable { message },
            JudgeError::Upstream { message, .. } | JudgeError::Config { message } => {
                Self::UpstreamError { message }
            }
        }
    }
}
