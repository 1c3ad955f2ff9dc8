/// Judge Client - Remote Code Execution
///
/// **Core Responsibility:**
/// Send source code and stdin to the remote judge service and return its raw result.
///
/// **Critical Architectural Boundary:**
/// - Client knows HOW to reach the judge (URL, headers, timeout)
/// - Client does NOT know scoring rules
/// - Client does NOT compare outputs
/// - Client never executes code locally
///
/// The judge status string is classified into a `JudgeStatus` here, once,
/// so nothing downstream re-matches description text.

use async_trait::async_trait;
use devlab_common::config::JudgeConfig;
use devlab_common::types::{ExecutionRequest, ExecutionResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::JudgeError;

const API_KEY_HEADER: &str = "x-rapidapi-key";
const API_HOST_HEADER: &str = "x-rapidapi-host";

/// Executes one request against a judge backend.
///
/// Implementations hold no per-call state and are shared across requests.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, JudgeError>;
}

#[derive(Debug, Serialize)]
struct SubmissionBody<'a> {
    source_code: &'a str,
    language_id: u32,
    stdin: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    status: Option<SubmissionStatus>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    description: Option<String>,
}

/// HTTP client for a Judge0-compatible service in synchronous (`wait=true`) mode
#[derive(Debug, Clone)]
pub struct Judge0Client {
    client: reqwest::Client,
    url: String,
}

impl Judge0Client {
    pub fn new(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(auth_headers(config)?)
            .build()
            .map_err(|e| JudgeError::Config {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: config.submissions_url(),
        })
    }
}

/// API key header, plus host header only when a key is configured
fn auth_headers(config: &JudgeConfig) -> Result<HeaderMap, JudgeError> {
    let mut headers = HeaderMap::new();
    let Some(key) = config.api_key.as_deref() else {
        return Ok(headers);
    };

    headers.insert(HeaderName::from_static(API_KEY_HEADER), header_value(key)?);
    if let Some(host) = config.api_host.as_deref() {
        headers.insert(HeaderName::from_static(API_HOST_HEADER), header_value(host)?);
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, JudgeError> {
    let mut value = HeaderValue::from_str(value).map_err(|e| JudgeError::Config {
        message: format!("invalid header value: {}", e),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl Judge for Judge0Client {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, JudgeError> {
        let body = SubmissionBody {
            source_code: &request.source_code,
            language_id: request.language_id,
            stdin: &request.stdin,
        };

        let start = Instant::now();
        let response = self.client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                language_id = request.language_id,
                "Judge rejected submission"
            );
            return Err(JudgeError::Upstream {
                status: Some(status.as_u16()),
                message: format!("HTTP {}: {}", status.as_u16(), text.trim()),
            });
        }

        let parsed: SubmissionResponse = response.json().await?;
        let result = ExecutionResult::from_parts(
            parsed.stdout,
            parsed.stderr,
            parsed.compile_output,
            parsed.status.and_then(|s| s.description),
        );

        debug!(
            language_id = request.language_id,
            status = %result.description,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Judge call completed"
        );

        Ok(result)
    }
}
