// src/client.rs

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Instant;

use crate::config::ServiceConfig;
use crate::errors::{AssessError, Result, SERVICE_FALLBACK_MESSAGE};
use crate::models::{EvaluationResult, Submission};

/// Path of the scoring endpoint on the evaluation service.
pub const CALCULATE_PATH: &str = "/api/calculate";

/// Something that can score a submitted answer.
///
/// The HTTP implementation talks to the evaluation service; tests swap in scripted ones.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, submission: &Submission) -> Result<EvaluationResult>;
}

/// Sends submissions to the evaluation service as multipart form posts.
pub struct HttpEvaluator {
    client: Client,
    config: ServiceConfig,
}

impl HttpEvaluator {
    pub fn new(client: Client, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), CALCULATE_PATH)
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    async fn evaluate(&self, submission: &Submission) -> Result<EvaluationResult> {
        let url = self.endpoint();
        log::info!(
            "Posting attempt {} to {} ({} bytes, marks {})",
            submission.attempt_id,
            url,
            submission.file.bytes.len(),
            submission.marks
        );

        let start = Instant::now();
        let resp = self
            .client
            .post(&url)
            .multipart(build_form(submission))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        log::info!(
            "Attempt {} answered {} ({}ms)",
            submission.attempt_id,
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }

        serde_json::from_str::<EvaluationResult>(&body).map_err(AssessError::transport)
    }
}

/// Parts `file`, `text` and `marks`. The question is never sent.
fn build_form(submission: &Submission) -> Form {
    Form::new()
        .part("file", file_part(submission))
        .text("text", submission.text.clone())
        .text("marks", submission.marks.to_string())
}

fn file_part(submission: &Submission) -> Part {
    let file = &submission.file;
    // The service rejects an empty file name with "No selected file".
    let file_name = if file.name.is_empty() { "upload" } else { file.name.as_str() };
    let part = || Part::bytes(file.bytes.clone()).file_name(file_name.to_string());

    match file.content_type.as_deref() {
        Some(content_type) => part().mime_str(content_type).unwrap_or_else(|e| {
            log::debug!("Sending '{}' without content type: {}", file_name, e);
            part()
        }),
        None => part(),
    }
}

/// Maps a non-2xx body to an error. A body that is not JSON is a transport failure.
fn service_error(status: u16, body: &str) -> AssessError {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return AssessError::transport(e),
    };

    let message = match parsed.get("error") {
        Some(value) if is_falsy(value) => SERVICE_FALLBACK_MESSAGE.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => SERVICE_FALLBACK_MESSAGE.to_string(),
    };

    AssessError::Service { status, message }
}

/// `null`, `false`, `0` and `""` carry no message.
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}
