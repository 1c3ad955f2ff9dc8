//! Problem lookup and submission persistence.
//!
//! `RedisStore` backs production; `MemoryStore` backs tests and local runs.

use async_trait::async_trait;
use devlab_common::redis as keys;
use devlab_common::types::{Problem, Submission};
use redis::aio::ConnectionManager;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::StoreError;

#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn find_problem(&self, problem_id: &str) -> Result<Option<Problem>, StoreError>;

    async fn list_problems(&self) -> Result<Vec<Problem>, StoreError>;
}

/// Append-only submission log keyed by user+problem
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Returns only once the record is durably written
    async fn append_submission(&self, submission: &Submission) -> Result<(), StoreError>;

    /// A user's submissions for one problem, oldest first
    async fn list_submissions(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> Result<Vec<Submission>, StoreError>;
}

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }

    pub async fn put_problem(&self, problem: &Problem) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        keys::put_problem(&mut conn, problem).await?;
        Ok(())
    }

    pub async fn clear_problems(&self) -> Result<usize, StoreError> {
        let mut conn = self.conn.clone();
        Ok(keys::clear_problems(&mut conn).await?)
    }
}

#[async_trait]
impl ProblemStore for RedisStore {
    async fn find_problem(&self, problem_id: &str) -> Result<Option<Problem>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(keys::get_problem(&mut conn, problem_id).await?)
    }

    async fn list_problems(&self) -> Result<Vec<Problem>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(keys::list_problems(&mut conn).await?)
    }
}

#[async_trait]
impl SubmissionStore for RedisStore {
    async fn append_submission(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        keys::append_submission(&mut conn, submission).await?;
        Ok(())
    }

    async fn list_submissions(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(keys::list_submissions(&mut conn, user_id, problem_id).await?)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    problems: RwLock<BTreeMap<String, Problem>>,
    submissions: RwLock<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_problems(problems: impl IntoIterator<Item = Problem>) -> Self {
        let problems = problems.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            problems: RwLock::new(problems),
            submissions: RwLock::new(Vec::new()),
        }
    }

    pub async fn put_problem(&self, problem: Problem) {
        self.problems.write().await.insert(problem.id.clone(), problem);
    }

    /// Every recorded submission, in append order
    pub async fn submissions(&self) -> Vec<Submission> {
        self.submissions.read().await.clone()
    }
}

#[async_trait]
impl ProblemStore for MemoryStore {
    async fn find_problem(&self, problem_id: &str) -> Result<Option<Problem>, StoreError> {
        Ok(self.problems.read().await.get(problem_id).cloned())
    }

    async fn list_problems(&self) -> Result<Vec<Problem>, StoreError> {
        Ok(self.problems.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append_submission(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut submissions = self.submissions.write().await;
        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(StoreError::Backend {
                message: format!("submission {} already exists", submission.id),
            });
        }
        submissions.push(submission.clone());
        Ok(())
    }

    async fn list_submissions(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .filter(|s| s.user_id == user_id && s.problem_id == problem_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devlab_common::types::{Difficulty, Verdict};
    use uuid::Uuid;

    fn problem(id: &str) -> Problem {
        Problem {
            id: id.to_string(),
            title: id.to_uppercase(),
            short_description: String::new(),
            description: String::new(),
            difficulty: Difficulty::Medium,
            tags: Default::default(),
            constraints: vec![],
            input_format: String::new(),
            output_format: String::new(),
            samples: vec![],
            sample_tests: vec![],
            hidden_tests: vec![],
        }
    }

    fn submission(user: &str, problem: &str) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            problem_id: problem.to_string(),
            language: "python".to_string(),
            language_id: 71,
            source_code: "print(1)".to_string(),
            verdict: Verdict::Accepted,
            output: "1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_problem_lookup() {
        let store = MemoryStore::with_problems([problem("b"), problem("a")]);
        assert!(store.find_problem("a").await.unwrap().is_some());
        assert!(store.find_problem("zzz").await.unwrap().is_none());

        let ids: Vec<String> = store
            .list_problems()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_memory_submissions_keyed_by_user_and_problem() {
        let store = MemoryStore::new();
        store.append_submission(&submission("harry", "p1")).await.unwrap();
        store.append_submission(&submission("harry", "p2")).await.unwrap();
        store.append_submission(&submission("ron", "p1")).await.unwrap();

        assert_eq!(store.list_submissions("harry", "p1").await.unwrap().len(), 1);
        assert_eq!(store.submissions().await.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_submission_never_overwritten() {
        let store = MemoryStore::new();
        let record = submission("harry", "p1");
        store.append_submission(&record).await.unwrap();
        assert!(store.append_submission(&record).await.is_err());
        assert_eq!(store.submissions().await.len(), 1);
    }
}
