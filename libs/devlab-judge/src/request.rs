use serde::Deserialize;

use crate::error::SubmissionError;

/// Body of a run or submit call as it arrives over the wire.
///
/// Every field is optional here so that a missing field is reported as an
/// invalid request rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    pub problem_id: Option<String>,
    pub source_code: Option<String>,
    pub language_id: Option<u32>,
    pub language: Option<String>,
}

/// A validated run or submit command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCommand {
    pub problem_id: String,
    pub source_code: String,
    pub language_id: u32,
    pub language: String,
}

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "problemId, sourceCode, languageId and language are required.";

impl CodeRequest {
    /// Reject requests with a missing, blank or zero required field
    pub fn validate(self) -> Result<CodeCommand, SubmissionError> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        match (
            present(self.problem_id),
            present(self.source_code),
            self.language_id.filter(|id| *id != 0),
            present(self.language),
        ) {
            (Some(problem_id), Some(source_code), Some(language_id), Some(language)) => {
                Ok(CodeCommand {
                    problem_id: problem_id.trim().to_string(),
                    source_code,
                    language_id,
                    language: language.trim().to_string(),
                })
            }
            _ => Err(SubmissionError::InvalidRequest {
                message: REQUIRED_FIELDS_MESSAGE.to_string(),
            }),
        }
    }
}
