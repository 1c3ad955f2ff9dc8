// CLI commands for operating DevLab
use anyhow::{bail, Context, Result};
use devlab_common::config::JudgeConfig;
use devlab_common::types::Problem;
use devlab_judge::{
    CodeCommand, Judge0Client, ProblemStore, RedisStore, SubmissionService, SubmissionStore,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemsFile {
    pub problems: Vec<Problem>,
}

/// Load and validate a problems file
fn load_problems_file(path: &Path) -> Result<Vec<Problem>> {
    if !path.exists() {
        bail!("Problems file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_problems(&content)
}

fn parse_problems(content: &str) -> Result<Vec<Problem>> {
    let file: ProblemsFile =
        serde_json::from_str(content).context("Failed to parse problems file")?;

    let mut seen = HashSet::new();
    for problem in &file.problems {
        if problem.id.trim().is_empty() || problem.title.trim().is_empty() {
            bail!("Every problem needs a non-empty id and title");
        }
        if !seen.insert(problem.id.as_str()) {
            bail!("Problem '{}' appears more than once", problem.id);
        }
    }

    Ok(file.problems)
}

async fn connect(redis_url: &str) -> Result<RedisStore> {
    RedisStore::connect(redis_url)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", redis_url))
}

/// Seed problems into Redis
pub async fn seed(redis_url: &str, file: &Path, reset: bool) -> Result<()> {
    let problems = load_problems_file(file)?;
    let store = connect(redis_url).await?;

    if reset {
        let removed = store.clear_problems().await?;
        println!("🧹 Removed {} existing problem(s)", removed);
    }

    for problem in &problems {
        store
            .put_problem(problem)
            .await
            .with_context(|| format!("Failed to store problem '{}'", problem.id))?;
        println!(
            "  ✓ {} ({} sample / {} hidden tests)",
            problem.id,
            problem.sample_tests.len(),
            problem.hidden_tests.len()
        );
    }

    println!("✅ Seeded {} problem(s) from {}", problems.len(), file.display());
    Ok(())
}

/// List stored problems
pub async fn list_problems(redis_url: &str) -> Result<()> {
    let store = connect(redis_url).await?;
    let problems = store.list_problems().await?;

    if problems.is_empty() {
        println!("No problems stored. Seed some with: devlab-cli seed");
        return Ok(());
    }

    for problem in problems {
        let tags: Vec<&str> = problem.tags.iter().map(String::as_str).collect();
        println!(
            "{:<24} {:<8} {}  [{}]",
            problem.id,
            problem.difficulty,
            problem.title,
            tags.join(", ")
        );
    }
    Ok(())
}

/// Run a source file against a problem through the configured judge
pub async fn run_file(
    redis_url: &str,
    problem_id: &str,
    language: &str,
    language_id: u32,
    file: &Path,
) -> Result<()> {
    let source_code = fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file {}", file.display()))?;

    let store = Arc::new(connect(redis_url).await?);
    let judge = Judge0Client::new(&JudgeConfig::from_env()).context("Failed to build judge client")?;
    let service = SubmissionService::new(Arc::new(judge), store.clone(), store);

    println!("🚀 Running {} against '{}'...", file.display(), problem_id);

    let command = CodeCommand {
        problem_id: problem_id.to_string(),
        source_code,
        language_id,
        language: language.to_string(),
    };
    let outcome = service.run(&command).await?;

    println!("Verdict: {}", outcome.verdict);
    println!("Output:\n{}", outcome.output);
    Ok(())
}

/// Show a user's submissions for a problem, oldest first
pub async fn list_submissions(redis_url: &str, user_id: &str, problem_id: &str) -> Result<()> {
    let store = connect(redis_url).await?;
    let submissions = store.list_submissions(user_id, problem_id).await?;

    if submissions.is_empty() {
        println!("No submissions by '{}' for '{}'", user_id, problem_id);
        return Ok(());
    }

    for submission in submissions {
        println!(
            "{}  {:<8} {:<24} {}",
            submission.created_at.format("%Y-%m-%d %H:%M:%S"),
            submission.language,
            submission.verdict,
            submission.id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_problems_file() {
        let problems = load_problems_file(Path::new("../../config/problems.json")).unwrap();
        let reverse = problems
            .iter()
            .find(|p| p.id == "reverse-the-stack")
            .expect("seed data contains reverse-the-stack");
        assert_eq!(reverse.sample_tests[0].expected_output, "5 4 3 2 1");
        assert_eq!(reverse.hidden_tests[0].input, "3\n10 20 30");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"{"problems": [
            {"id": "a", "title": "A"},
            {"id": "a", "title": "Again"}
        ]}"#;
        assert!(parse_problems(content).is_err());
    }

    #[test]
    fn test_missing_title_rejected() {
        assert!(parse_problems(r#"{"problems": [{"id": "a", "title": " "}]}"#).is_err());
    }
}
