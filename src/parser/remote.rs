//! HTTP client for the hosted document-parsing service.
//!
//! The service follows an upload/poll/fetch shape:
//!
//! 1. `POST {base}/api/parsing/upload` — multipart form carrying the PDF
//!    bytes plus the static parameter set (result type, instruction prompt,
//!    separator, vision model, worker hint). Returns a job id.
//! 2. `GET {base}/api/parsing/job/{id}` — poll until the job leaves
//!    `PENDING`.
//! 3. `GET {base}/api/parsing/job/{id}/result/json` — the page texts.
//!
//! One `RemoteParser` (and its connection pool) is shared across the whole
//! batch; per-document state is confined to the request/poll cycle. Every
//! failure maps to a typed [`ParseError`] carrying the source file name, so
//! the batch can log and skip without string-matching.

use crate::config::BatchConfig;
use crate::error::{BatchError, ParseError};
use crate::parser::DocumentParser;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Client for the remote parsing service.
///
/// Cheap to clone is not needed — wrap in `Arc` via
/// [`crate::parser::SharedParser`] and share one instance per batch.
pub struct RemoteParser {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    vision_api_key: String,
    vision_model: String,
    page_separator: String,
    instruction: String,
    num_workers: usize,
    verbose: bool,
    request_timeout: Duration,
    job_timeout: Duration,
    poll_interval: Duration,
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
    #[serde(default)]
    #[allow(dead_code)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobResult {
    #[serde(default)]
    pages: Vec<PageText>,
}

#[derive(Debug, Deserialize)]
struct PageText {
    #[serde(default)]
    #[allow(dead_code)]
    page: usize,
    #[serde(default)]
    text: String,
}

impl RemoteParser {
    /// Build a parser from the batch configuration.
    pub fn new(config: &BatchConfig) -> Result<Self, BatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BatchError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.credentials.parse_api_key.clone(),
            vision_api_key: config.credentials.vision_api_key.clone(),
            vision_model: config.vision_model.clone(),
            page_separator: config.page_separator.clone(),
            instruction: config.instruction().to_string(),
            num_workers: config.num_workers,
            verbose: config.verbose,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Upload the PDF and return the service-assigned job id.
    async fn upload(&self, pdf_bytes: Vec<u8>, file_name: &str) -> Result<String, ParseError> {
        let part = Part::bytes(pdf_bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ParseError::Network {
                file: file_name.to_string(),
                detail: e.to_string(),
            })?;

        // The static parameter set: identical for every document in the run.
        let form = Form::new()
            .part("file", part)
            .text("result_type", "text")
            .text("parsing_instruction", self.instruction.clone())
            .text("page_separator", self.page_separator.clone())
            .text("use_vendor_multimodal_model", "true")
            .text("vendor_multimodal_model_name", self.vision_model.clone())
            .text("vendor_multimodal_api_key", self.vision_api_key.clone())
            .text("num_workers", self.num_workers.to_string())
            .text("verbose", self.verbose.to_string());

        let url = format!("{}/api/parsing/upload", self.base_url);
        debug!("Uploading '{}' to {}", file_name, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| map_request_error(e, file_name, self.request_timeout))?;

        let response = check_status(response, file_name).await?;

        let upload: UploadResponse =
            response.json().await.map_err(|e| ParseError::Network {
                file: file_name.to_string(),
                detail: format!("malformed upload response: {e}"),
            })?;

        debug!("Job {} created for '{}'", upload.id, file_name);
        Ok(upload.id)
    }

    /// Poll the job until it succeeds, fails, or the job timeout elapses.
    async fn wait_for_job(&self, job_id: &str, file_name: &str) -> Result<(), ParseError> {
        let deadline = Instant::now() + self.job_timeout;
        let url = format!("{}/api/parsing/job/{}", self.base_url, job_id);

        loop {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_key)
                .send()
                .await
                .map_err(|e| map_request_error(e, file_name, self.request_timeout))?;

            let response = check_status(response, file_name).await?;

            let status: JobStatus =
                response.json().await.map_err(|e| ParseError::Network {
                    file: file_name.to_string(),
                    detail: format!("malformed status response: {e}"),
                })?;

            match status.status.to_ascii_uppercase().as_str() {
                "SUCCESS" | "COMPLETED" => return Ok(()),
                "ERROR" | "CANCELED" | "CANCELLED" => {
                    return Err(ParseError::Service {
                        file: file_name.to_string(),
                        detail: status
                            .error_message
                            .unwrap_or_else(|| format!("job ended with status {}", status.status)),
                    })
                }
                other => {
                    debug!("Job {} for '{}' is {}", job_id, file_name, other);
                }
            }

            if Instant::now() >= deadline {
                warn!("Job {} for '{}' exceeded the job timeout", job_id, file_name);
                return Err(ParseError::Timeout {
                    file: file_name.to_string(),
                    secs: self.job_timeout.as_secs(),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetch the finished job's page texts.
    async fn fetch_result(&self, job_id: &str, file_name: &str) -> Result<Vec<String>, ParseError> {
        let url = format!("{}/api/parsing/job/{}/result/json", self.base_url, job_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| map_request_error(e, file_name, self.request_timeout))?;

        let response = check_status(response, file_name).await?;

        let result: JobResult = response.json().await.map_err(|e| ParseError::Network {
            file: file_name.to_string(),
            detail: format!("malformed result response: {e}"),
        })?;

        Ok(result.pages.into_iter().map(|p| p.text).collect())
    }
}

#[async_trait]
impl DocumentParser for RemoteParser {
    async fn parse(&self, pdf_bytes: Vec<u8>, file_name: &str) -> Result<Vec<String>, ParseError> {
        let job_id = self.upload(pdf_bytes, file_name).await?;
        self.wait_for_job(&job_id, file_name).await?;
        let pages = self.fetch_result(&job_id, file_name).await?;
        info!(
            "Service returned {} page(s) for '{}' (job {})",
            pages.len(),
            file_name,
            job_id
        );
        Ok(pages)
    }
}

// ── Error mapping ────────────────────────────────────────────────────────

/// Map a reqwest transport error to a typed per-document failure.
fn map_request_error(e: reqwest::Error, file_name: &str, request_timeout: Duration) -> ParseError {
    if e.is_timeout() {
        ParseError::Timeout {
            file: file_name.to_string(),
            secs: request_timeout.as_secs(),
        }
    } else {
        ParseError::Network {
            file: file_name.to_string(),
            detail: e.to_string(),
        }
    }
}

/// Convert a non-2xx response into a typed failure, consuming the body for
/// the error detail. 401/403 get their own variant so auth problems from a
/// missing key read as what they are.
async fn check_status(
    response: reqwest::Response,
    file_name: &str,
) -> Result<reqwest::Response, ParseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response.text().await.unwrap_or_default();
    Err(classify_http_failure(status, file_name, detail))
}

fn classify_http_failure(status: StatusCode, file_name: &str, detail: String) -> ParseError {
    let detail = if detail.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        // Keep error lines readable when the service returns an HTML page.
        detail.chars().take(200).collect()
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ParseError::Auth {
            file: file_name.to_string(),
            detail,
        },
        _ => ParseError::Http {
            file: file_name.to_string(),
            status: status.as_u16(),
            detail,
        },
    }
}
