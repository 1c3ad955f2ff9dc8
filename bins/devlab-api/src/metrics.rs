// Prometheus metrics for the DevLab API

use async_trait::async_trait;
use devlab_common::types::{ExecutionRequest, ExecutionResult};
use devlab_judge::{Judge, JudgeError};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

lazy_static! {
    pub static ref VERDICTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "devlab_verdicts_total",
        "Verdicts returned, by mode (run/submit) and verdict",
        &["mode", "verdict"]
    )
    .expect("verdict counter registers once");
    pub static ref REQUEST_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "devlab_request_errors_total",
        "Failed requests by error kind",
        &["kind"]
    )
    .expect("error counter registers once");
    pub static ref JUDGE_CALL_SECONDS: HistogramVec = register_histogram_vec!(
        "devlab_judge_call_seconds",
        "Latency of judge service calls",
        &["outcome"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("judge histogram registers once");
}

/// Render every registered metric in the text exposition format
pub fn render() -> Result<(String, String), String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| e.to_string())?;
    let body = String::from_utf8(buffer).map_err(|e| e.to_string())?;
    Ok((encoder.format_type().to_string(), body))
}

/// Judge wrapper that records call latency by outcome
pub struct MeteredJudge {
    inner: Arc<dyn Judge>,
}

impl MeteredJudge {
    pub fn new(inner: Arc<dyn Judge>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Judge for MeteredJudge {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, JudgeError> {
        let start = Instant::now();
        let result = self.inner.execute(request).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(JudgeError::Unavailable { .. }) => "unavailable",
            Err(_) => "error",
        };
        JUDGE_CALL_SECONDS
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        result
    }
}
