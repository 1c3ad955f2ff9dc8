use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// One stdin/expected-stdout pair owned by a problem
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// Display-only example shown in the problem statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

/// A practice problem together with the test cases it owns.
///
/// Sample tests are visible to the learner and drive "run"; hidden tests are
/// withheld and drive "submit". Both sequences are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default, rename = "input")]
    pub input_format: String,
    #[serde(default, rename = "output")]
    pub output_format: String,
    #[serde(default)]
    pub samples: Vec<Sample>,
    #[serde(default)]
    pub sample_tests: Vec<TestCase>,
    #[serde(default)]
    pub hidden_tests: Vec<TestCase>,
}

impl Problem {
    /// The single test case used by "run": first sample, else first hidden
    pub fn run_test(&self) -> Option<&TestCase> {
        self.sample_tests
            .first()
            .or_else(|| self.hidden_tests.first())
    }

    /// The ordered test cases used by "submit": hidden, falling back to samples
    pub fn grading_tests(&self) -> &[TestCase] {
        if self.hidden_tests.is_empty() {
            &self.sample_tests
        } else {
            &self.hidden_tests
        }
    }

    pub fn summary(&self) -> ProblemSummary {
        ProblemSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            short_description: self.short_description.clone(),
            difficulty: self.difficulty,
            tags: self.tags.clone(),
        }
    }

    /// Statement view safe to send to learners; never carries test expectations
    pub fn public_view(&self) -> PublicProblem {
        PublicProblem {
            id: self.id.clone(),
            title: self.title.clone(),
            short_description: self.short_description.clone(),
            description: self.description.clone(),
            difficulty: self.difficulty,
            tags: self.tags.clone(),
            constraints: self.constraints.clone(),
            input_format: self.input_format.clone(),
            output_format: self.output_format.clone(),
            samples: self.samples.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProblem {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
    pub constraints: Vec<String>,
    #[serde(rename = "input")]
    pub input_format: String,
    #[serde(rename = "output")]
    pub output_format: String,
    pub samples: Vec<Sample>,
}

/// One execution sent to the judge service. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language: String,
    pub language_id: u32,
    pub stdin: String,
}

/// Judge status, classified once when the judge response is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeStatus {
    Success,
    CompileError,
    RuntimeError,
    TimeLimitExceeded,
    Other(String),
}

impl JudgeStatus {
    /// Classify a judge status description such as "Accepted",
    /// "Compilation Error" or "Runtime Error (NZEC)".
    pub fn from_description(description: &str) -> Self {
        let lower = description.trim().to_ascii_lowercase();
        if lower == "accepted" {
            JudgeStatus::Success
        } else if lower.starts_with("compilation error") || lower.starts_with("compile error") {
            JudgeStatus::CompileError
        } else if lower.starts_with("runtime error") {
            JudgeStatus::RuntimeError
        } else if lower.starts_with("time limit exceeded") {
            JudgeStatus::TimeLimitExceeded
        } else {
            JudgeStatus::Other(description.trim().to_string())
        }
    }

    /// Whether this status ends a submission with the judge's own description
    pub fn is_terminal(&self) -> bool {
        match self {
            JudgeStatus::Success => false,
            JudgeStatus::CompileError
            | JudgeStatus::RuntimeError
            | JudgeStatus::TimeLimitExceeded => true,
            JudgeStatus::Other(description) => description.to_ascii_lowercase().contains("error"),
        }
    }
}

/// Raw result of one judge execution. Consumed immediately by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    pub status: JudgeStatus,
    /// Status description exactly as the judge reported it
    pub description: String,
}

impl ExecutionResult {
    pub fn from_parts(
        stdout: Option<String>,
        stderr: Option<String>,
        compile_output: Option<String>,
        description: Option<String>,
    ) -> Self {
        let description = description.unwrap_or_default();
        Self {
            stdout: stdout.unwrap_or_default(),
            stderr: stderr.unwrap_or_default(),
            compile_output: compile_output.unwrap_or_default(),
            status: JudgeStatus::from_description(&description),
            description,
        }
    }
}

/// Final classification of a run or submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    SamplePassed,
    SampleFailed,
    Ran,
    /// Error description reported by the judge, e.g. "Time Limit Exceeded"
    Judge(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Accepted => "Accepted",
            Verdict::WrongAnswer => "Wrong Answer",
            Verdict::SamplePassed => "Sample Passed",
            Verdict::SampleFailed => "Sample Failed",
            Verdict::Ran => "Ran",
            Verdict::Judge(description) => description,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Verdict {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Accepted" => Verdict::Accepted,
            "Wrong Answer" => Verdict::WrongAnswer,
            "Sample Passed" => Verdict::SamplePassed,
            "Sample Failed" => Verdict::SampleFailed,
            "Ran" => Verdict::Ran,
            _ => Verdict::Judge(value),
        }
    }
}

impl From<Verdict> for String {
    fn from(value: Verdict) -> Self {
        value.as_str().to_string()
    }
}

/// Response of both "run" and "submit"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub verdict: Verdict,
    pub output: String,
}

/// Durable record of one "submit" attempt. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub user_id: String,
    pub problem_id: String,
    pub language: String,
    pub language_id: u32,
    pub source_code: String,
    pub verdict: Verdict,
    pub output: String,
    pub created_at: DateTime<Utc>,
}
