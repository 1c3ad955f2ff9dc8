use crate::types::{Problem, Submission};
use redis::{AsyncCommands, RedisResult};

/// Redis persistence semantics - defines only key layout and wire format
/// Ensures API and CLI never drift and Redis keys are deterministic

pub const PROBLEM_PREFIX: &str = "devlab:problem";
pub const PROBLEM_INDEX: &str = "devlab:problems";
pub const SUBMISSION_PREFIX: &str = "devlab:submission";
pub const SUBMISSION_INDEX_PREFIX: &str = "devlab:submissions";

/// Key holding one problem document
pub fn problem_key(problem_id: &str) -> String {
    format!("{}:{}", PROBLEM_PREFIX, problem_id)
}

/// Key holding one submission record
pub fn submission_key(submission_id: &uuid::Uuid) -> String {
    format!("{}:{}", SUBMISSION_PREFIX, submission_id)
}

/// Append-only list of submission ids for a user+problem pair
pub fn submission_index_key(user_id: &str, problem_id: &str) -> String {
    format!("{}:{}:{}", SUBMISSION_INDEX_PREFIX, user_id, problem_id)
}

fn to_json<T: serde::Serialize>(value: &T) -> RedisResult<String> {
    serde_json::to_string(value).map_err(|e| {
        redis::RedisError::from((redis::ErrorKind::TypeError, "serialization error", e.to_string()))
    })
}

fn from_json<T: serde::de::DeserializeOwned>(payload: &str) -> RedisResult<T> {
    serde_json::from_str(payload).map_err(|e| {
        redis::RedisError::from((redis::ErrorKind::TypeError, "deserialization error", e.to_string()))
    })
}

/// Store a problem document and register it in the index
pub async fn put_problem(
    conn: &mut redis::aio::ConnectionManager,
    problem: &Problem,
) -> RedisResult<()> {
    let payload = to_json(problem)?;

    redis::pipe()
        .atomic()
        .set(problem_key(&problem.id), payload)
        .ignore()
        .sadd(PROBLEM_INDEX, &problem.id)
        .ignore()
        .query_async(conn)
        .await
}

/// Retrieve a problem by id
pub async fn get_problem(
    conn: &mut redis::aio::ConnectionManager,
    problem_id: &str,
) -> RedisResult<Option<Problem>> {
    let payload: Option<String> = conn.get(problem_key(problem_id)).await?;

    match payload {
        Some(data) => Ok(Some(from_json(&data)?)),
        None => Ok(None),
    }
}

/// Retrieve every indexed problem, ordered by id
pub async fn list_problems(
    conn: &mut redis::aio::ConnectionManager,
) -> RedisResult<Vec<Problem>> {
    let mut ids: Vec<String> = conn.smembers(PROBLEM_INDEX).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    ids.sort();

    let keys: Vec<String> = ids.iter().map(|id| problem_key(id)).collect();
    let payloads: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(conn).await?;

    // Ids whose document vanished are skipped
    payloads
        .into_iter()
        .flatten()
        .map(|data| from_json(&data))
        .collect()
}

/// Remove every indexed problem
pub async fn clear_problems(conn: &mut redis::aio::ConnectionManager) -> RedisResult<usize> {
    let ids: Vec<String> = conn.smembers(PROBLEM_INDEX).await?;
    let mut pipe = redis::pipe();
    pipe.atomic();
    for id in &ids {
        pipe.del(problem_key(id)).ignore();
    }
    pipe.del(PROBLEM_INDEX).ignore();
    let _: () = pipe.query_async(conn).await?;

    Ok(ids.len())
}

/// Durably record a submission
///
/// The record is written with SET NX so an existing id is never overwritten,
/// and the user+problem index append happens in the same MULTI/EXEC block.
pub async fn append_submission(
    conn: &mut redis::aio::ConnectionManager,
    submission: &Submission,
) -> RedisResult<()> {
    let payload = to_json(submission)?;
    let key = submission_key(&submission.id);
    let index = submission_index_key(&submission.user_id, &submission.problem_id);

    let (created,): (bool,) = redis::pipe()
        .atomic()
        .set_nx(&key, payload)
        .rpush(&index, submission.id.to_string())
        .ignore()
        .query_async(conn)
        .await?;

    if !created {
        return Err(redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "submission already exists",
            key,
        )));
    }

    Ok(())
}

/// Retrieve a user's submissions for a problem, oldest first
pub async fn list_submissions(
    conn: &mut redis::aio::ConnectionManager,
    user_id: &str,
    problem_id: &str,
) -> RedisResult<Vec<Submission>> {
    let ids: Vec<String> = conn
        .lrange(submission_index_key(user_id, problem_id), 0, -1)
        .await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let keys: Vec<String> = ids
        .iter()
        .map(|id| format!("{}:{}", SUBMISSION_PREFIX, id))
        .collect();
    let payloads: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(conn).await?;

    payloads
        .into_iter()
        .flatten()
        .map(|data| from_json(&data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_problem_key() {
        assert_eq!(problem_key("reverse-the-stack"), "devlab:problem:reverse-the-stack");
    }

    #[test]
    fn test_submission_key_deterministic() {
        let id = Uuid::new_v4();
        let key1 = submission_key(&id);
        let key2 = submission_key(&id);
        assert_eq!(key1, key2);
        assert!(key1.starts_with("devlab:submission:"));
        assert!(key1.contains(&id.to_string()));
    }

    #[test]
    fn test_submission_index_key_format() {
        assert_eq!(
            submission_index_key("harry", "reverse-the-stack"),
            "devlab:submissions:harry:reverse-the-stack"
        );
    }
}
