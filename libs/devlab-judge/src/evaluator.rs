/// Verdict Evaluator - Language-Agnostic Scoring Logic
///
/// **Core Responsibility:**
/// Compare raw judge results against expected outputs and decide verdicts.
///
/// **Critical Properties:**
/// - Knows nothing about HTTP
/// - Knows nothing about Redis
/// - Pure functions: (judge result, expected output) → verdict
///
/// **Normalization Rules (applied to observed AND expected):**
/// - `\r\n` line endings become `\n`
/// - Leading/trailing whitespace trimmed
/// - Internal whitespace and case preserved
///
/// **Observed Output Precedence:**
/// compile output > stderr > stdout, so compile errors always surface.

use devlab_common::types::{ExecutionResult, Outcome, TestCase, Verdict};
use std::ops::ControlFlow;

/// Result of comparing one observed output with one expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed,
    /// Expected output is empty after normalization; nothing to compare
    Unscored,
}

/// The text a learner should see for one execution
pub fn observed_output(result: &ExecutionResult) -> &str {
    if !result.compile_output.is_empty() {
        &result.compile_output
    } else if !result.stderr.is_empty() {
        &result.stderr
    } else {
        &result.stdout
    }
}

/// Normalize output text for comparison
///
/// Any run of `\r` directly before `\n` is dropped, so `\r\r\n` collapses in
/// one pass and normalizing twice changes nothing.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_cr = 0usize;

    for ch in text.chars() {
        match ch {
            '\r' => pending_cr += 1,
            '\n' => {
                pending_cr = 0;
                out.push('\n');
            }
            other => {
                out.extend(std::iter::repeat('\r').take(pending_cr));
                pending_cr = 0;
                out.push(other);
            }
        }
    }
    out.extend(std::iter::repeat('\r').take(pending_cr));

    out.trim().to_string()
}

/// Score one observed output against one expected output
pub fn score_single(observed: &str, expected: &str) -> TestOutcome {
    let expected = normalize(expected);
    if expected.is_empty() {
        return TestOutcome::Unscored;
    }

    if normalize(observed) == expected {
        TestOutcome::Passed
    } else {
        TestOutcome::Failed
    }
}

/// Verdict for "run" mode: scored against the chosen test when it has an expectation
pub fn run_verdict(test: Option<&TestCase>, observed: &str) -> Verdict {
    let Some(test) = test else {
        return Verdict::Ran;
    };

    match score_single(observed, &test.expected_output) {
        TestOutcome::Passed => Verdict::SamplePassed,
        TestOutcome::Failed => Verdict::SampleFailed,
        TestOutcome::Unscored => Verdict::Ran,
    }
}

/// Running state of a "submit" grading pass
///
/// Starts at `Accepted`; each observed result either keeps grading going or
/// breaks with a terminal verdict. A break is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grading {
    verdict: Verdict,
    output: String,
    evaluated: usize,
}

impl Default for Grading {
    fn default() -> Self {
        Self::new()
    }
}

impl Grading {
    pub fn new() -> Self {
        Self {
            verdict: Verdict::Accepted,
            output: String::new(),
            evaluated: 0,
        }
    }

    /// Fold one judge result into the grading state
    ///
    /// Judge-reported errors win over output comparison, then a scored
    /// mismatch ends grading with `Wrong Answer`.
    pub fn observe(self, test: &TestCase, result: &ExecutionResult) -> ControlFlow<Self, Self> {
        let observed = observed_output(result);
        let next = Self {
            output: normalize(observed),
            evaluated: self.evaluated + 1,
            ..self
        };

        if result.status.is_terminal() {
            return ControlFlow::Break(Self {
                verdict: Verdict::Judge(result.description.trim().to_string()),
                ..next
            });
        }

        match score_single(observed, &test.expected_output) {
            TestOutcome::Failed => ControlFlow::Break(Self {
                verdict: Verdict::WrongAnswer,
                ..next
            }),
            TestOutcome::Passed | TestOutcome::Unscored => ControlFlow::Continue(next),
        }
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Number of judge results folded in so far
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn finish(self) -> Outcome {
        Outcome {
            verdict: self.verdict,
            output: self.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stdout: &str, stderr: &str, compile_output: &str, description: &str) -> ExecutionResult {
        ExecutionResult::from_parts(
            Some(stdout.to_string()),
            Some(stderr.to_string()),
            Some(compile_output.to_string()),
            Some(description.to_string()),
        )
    }

    fn accepted(stdout: &str) -> ExecutionResult {
        result(stdout, "", "", "Accepted")
    }

    #[test]
    fn test_normalize_output() {
        assert_eq!(normalize("hello"), "hello");
        assert_eq!(normalize("  hello  "), "hello");
        assert_eq!(normalize("hello\n"), "hello");
        assert_eq!(normalize("\nhello\n"), "hello");
        assert_eq!(normalize("30 20 10\r\n"), "30 20 10");
        assert_eq!(normalize("a\r\nb\r\nc"), "a\nb\nc");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_keeps_lone_carriage_return() {
        assert_eq!(normalize("a\rb"), "a\rb");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "",
            " x ",
            "a\r\r\nb",
            "a\r\r\r\n\r\nb\r",
            "\r\n\r\n",
            "line1\nline2\r\nline3\r",
            "tab\t\r\n",
            "\r\rx\r\r",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_observed_output_precedence() {
        assert_eq!(observed_output(&result("out", "err", "compile", "Compilation Error")), "compile");
        assert_eq!(observed_output(&result("out", "err", "", "Runtime Error (NZEC)")), "err");
        assert_eq!(observed_output(&result("out", "", "", "Accepted")), "out");
        assert_eq!(observed_output(&ExecutionResult::from_parts(None, None, None, None)), "");
    }

    #[test]
    fn test_score_single() {
        assert_eq!(score_single("120", "120"), TestOutcome::Passed);
        assert_eq!(score_single("  hello  \n", "hello"), TestOutcome::Passed);
        assert_eq!(score_single("line1\r\nline2\r\n", "line1\nline2"), TestOutcome::Passed);
        assert_eq!(score_single("hello", "Hello"), TestOutcome::Failed);
        assert_eq!(score_single("anything", ""), TestOutcome::Unscored);
        assert_eq!(score_single("anything", " \r\n "), TestOutcome::Unscored);
    }

    #[test]
    fn test_run_verdict() {
        let test = TestCase::new("5\n1 2 3 4 5", "5 4 3 2 1");
        assert_eq!(run_verdict(Some(&test), "5 4 3 2 1\n"), Verdict::SamplePassed);
        assert_eq!(run_verdict(Some(&test), "1 2 3 4 5"), Verdict::SampleFailed);
        assert_eq!(run_verdict(Some(&TestCase::new("", "")), "x"), Verdict::Ran);
        assert_eq!(run_verdict(None, "x"), Verdict::Ran);
    }

    #[test]
    fn test_grading_continues_on_pass() {
        let test = TestCase::new("3\n10 20 30", "30 20 10");
        let grading = match Grading::new().observe(&test, &accepted("30 20 10\r\n")) {
            ControlFlow::Continue(g) => g,
            ControlFlow::Break(_) => panic!("passing test must not stop grading"),
        };
        assert_eq!(grading.verdict(), &Verdict::Accepted);
        assert_eq!(grading.evaluated(), 1);
        assert_eq!(grading.finish().output, "30 20 10");
    }

    #[test]
    fn test_grading_breaks_on_mismatch() {
        let test = TestCase::new("1", "2");
        let grading = match Grading::new().observe(&test, &accepted("3")) {
            ControlFlow::Break(g) => g,
            ControlFlow::Continue(_) => panic!("mismatch must stop grading"),
        };
        assert_eq!(grading.verdict(), &Verdict::WrongAnswer);
        assert_eq!(grading.finish().output, "3");
    }

    #[test]
    fn test_grading_judge_error_wins_over_comparison() {
        let test = TestCase::new("1", "2");
        let tle = result("", "", "", "Time Limit Exceeded");
        let grading = match Grading::new().observe(&test, &tle) {
            ControlFlow::Break(g) => g,
            ControlFlow::Continue(_) => panic!("judge error must stop grading"),
        };
        assert_eq!(grading.verdict().as_str(), "Time Limit Exceeded");

        let compile = result("", "", "main.cpp:1: error", "Compilation Error");
        let outcome = match Grading::new().observe(&test, &compile) {
            ControlFlow::Break(g) => g.finish(),
            ControlFlow::Continue(_) => panic!("compile error must stop grading"),
        };
        assert_eq!(outcome.verdict, Verdict::Judge("Compilation Error".to_string()));
        assert_eq!(outcome.output, "main.cpp:1: error");
    }

    #[test]
    fn test_grading_unscored_test_continues() {
        let test = TestCase::new("", "");
        let flow = Grading::new().observe(&test, &accepted("whatever"));
        assert!(matches!(flow, ControlFlow::Continue(_)));
    }
}
