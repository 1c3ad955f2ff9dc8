/// Submission Orchestrator - High-Level Orchestration
///
/// **Responsibility:**
/// Coordinate judge client, evaluator and stores to produce run/submit results.
///
/// **Architecture:**
/// 1. Load the problem and pick its test cases
/// 2. Use a `Judge` to execute each test case (judge.rs)
/// 3. Use the evaluator to score each result (evaluator.rs)
/// 4. Persist one `Submission` per submit (store.rs)
///
/// This module is the glue layer - it knows nothing about:
/// - How code is executed (the judge's job)
/// - How outputs are compared (the evaluator's job)
///
/// Test cases within one submission always run one after another, so a
/// failing case stops the rest from ever reaching the judge.

use chrono::Utc;
use devlab_common::types::{ExecutionRequest, Outcome, Problem, Submission, TestCase};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::SubmissionError;
use crate::evaluator::{self, Grading};
use crate::judge::Judge;
use crate::request::CodeCommand;
use crate::store::{ProblemStore, SubmissionStore};

#[derive(Clone)]
pub struct SubmissionService {
    judge: Arc<dyn Judge>,
    problems: Arc<dyn ProblemStore>,
    submissions: Arc<dyn SubmissionStore>,
}

impl SubmissionService {
    pub fn new(
        judge: Arc<dyn Judge>,
        problems: Arc<dyn ProblemStore>,
        submissions: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            judge,
            problems,
            submissions,
        }
    }

    /// Execute against one test case and report a sample verdict. Nothing is persisted.
    #[instrument(skip(self, command), fields(problem_id = %command.problem_id, language = %command.language))]
    pub async fn run(&self, command: &CodeCommand) -> Result<Outcome, SubmissionError> {
        let problem = self.problem(&command.problem_id).await?;
        let test = problem.run_test();

        let stdin = test.map(|t| t.input.as_str()).unwrap_or_default();
        let result = self.judge.execute(&execution_request(command, stdin)).await?;

        let observed = evaluator::observed_output(&result);
        let outcome = Outcome {
            verdict: evaluator::run_verdict(test, observed),
            output: evaluator::normalize(observed),
        };

        info!(verdict = %outcome.verdict, judge_status = %result.description, "Run completed");
        Ok(outcome)
    }

    /// Grade against every hidden test (or samples when there are none),
    /// then durably record exactly one submission.
    #[instrument(
        skip(self, command),
        fields(problem_id = %command.problem_id, language = %command.language, user_id = %user_id)
    )]
    pub async fn submit(
        &self,
        command: &CodeCommand,
        user_id: &str,
    ) -> Result<Outcome, SubmissionError> {
        let problem = self.problem(&command.problem_id).await?;

        let tests = problem.grading_tests();
        if tests.is_empty() {
            warn!("Problem has no test cases");
            return Err(SubmissionError::NoTestCases {
                problem_id: problem.id.clone(),
            });
        }

        let grading = self.grade(command, tests).await?;
        let evaluated = grading.evaluated();
        let outcome = grading.finish();

        let submission = Submission {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            problem_id: problem.id.clone(),
            language: command.language.clone(),
            language_id: command.language_id,
            source_code: command.source_code.clone(),
            verdict: outcome.verdict.clone(),
            output: outcome.output.clone(),
            created_at: Utc::now(),
        };

        self.submissions
            .append_submission(&submission)
            .await
            .map_err(|e| SubmissionError::PersistenceFailure {
                message: e.to_string(),
            })?;

        info!(
            submission_id = %submission.id,
            verdict = %outcome.verdict,
            evaluated,
            total = tests.len(),
            "Submission recorded"
        );
        Ok(outcome)
    }

    /// Fold judge results over the test cases in order until one breaks
    async fn grade(
        &self,
        command: &CodeCommand,
        tests: &[TestCase],
    ) -> Result<Grading, SubmissionError> {
        let mut grading = Grading::new();

        for (idx, test) in tests.iter().enumerate() {
            let result = self
                .judge
                .execute(&execution_request(command, &test.input))
                .await?;

            debug!(
                test_num = idx + 1,
                judge_status = %result.description,
                "Test case executed"
            );

            grading = match grading.observe(test, &result) {
                ControlFlow::Continue(next) => next,
                ControlFlow::Break(done) => return Ok(done),
            };
        }

        Ok(grading)
    }

    /// Resolve a problem id
    pub async fn problem(&self, problem_id: &str) -> Result<Problem, SubmissionError> {
        self.problems
            .find_problem(problem_id)
            .await
            .map_err(|e| SubmissionError::StorageUnavailable {
                message: e.to_string(),
            })?
            .ok_or_else(|| SubmissionError::ProblemNotFound {
                problem_id: problem_id.to_string(),
            })
    }

    pub async fn problems(&self) -> Result<Vec<Problem>, SubmissionError> {
        self.problems
            .list_problems()
            .await
            .map_err(|e| SubmissionError::StorageUnavailable {
                message: e.to_string(),
            })
    }

    /// A user's submissions for one problem, newest first
    pub async fn history(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> Result<Vec<Submission>, SubmissionError> {
        let mut submissions = self
            .submissions
            .list_submissions(user_id, problem_id)
            .await
            .map_err(|e| SubmissionError::StorageUnavailable {
                message: e.to_string(),
            })?;
        submissions.reverse();
        Ok(submissions)
    }
}

fn execution_request(command: &CodeCommand, stdin: &str) -> ExecutionRequest {
    ExecutionRequest {
        source_code: command.source_code.clone(),
        language: command.language.clone(),
        language_id: command.language_id,
        stdin: stdin.to_string(),
    }
}
