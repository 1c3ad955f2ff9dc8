//! Submission-verdict pipeline: judge client, evaluator, orchestrator and stores.

pub mod error;
pub mod evaluator;
pub mod executor;
pub mod judge;
pub mod request;
pub mod store;


pub use error::{JudgeError, StoreError, SubmissionError};
pub use executor::SubmissionService;
pub use judge::{Judge, Judge0Client};
pub use request::{CodeCommand, CodeRequest};
pub use store::{MemoryStore, ProblemStore, RedisStore, SubmissionStore};
