// Application configuration
// Everything is read from the environment once at startup and passed down explicitly

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_JUDGE_URL: &str = "https://judge0-ce.p.rapidapi.com";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LANGUAGES_PATH: &str = "config/languages.json";

/// Upper bound for a single judge call
pub const JUDGE_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the remote judge service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
    pub timeout: Duration,
}

impl JudgeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            api_host: None,
            timeout: Duration::from_secs(JUDGE_TIMEOUT_SECS),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_empty("JUDGE0_API_URL").unwrap_or_else(|| DEFAULT_JUDGE_URL.to_string()),
            api_key: non_empty("JUDGE0_API_KEY"),
            api_host: non_empty("JUDGE0_API_HOST"),
            timeout: Duration::from_secs(JUDGE_TIMEOUT_SECS),
        }
    }

    /// Synchronous submission endpoint (waits for the run to finish)
    pub fn submissions_url(&self) -> String {
        format!(
            "{}/submissions?base64_encoded=false&wait=true",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub redis_url: String,
    pub languages_path: PathBuf,
    pub judge: JudgeConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let redis_url = lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());
        let languages_path = lookup("LANGUAGES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LANGUAGES_PATH));

        Self {
            port,
            redis_url,
            languages_path,
            judge: JudgeConfig::from_lookup(&lookup),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
