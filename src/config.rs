//! Configuration types for batch guideline conversion.
//!
//! All behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to pass the whole configuration into the remote client, log it, and diff
//! two runs to understand why their outputs differ.
//!
//! The static parameter set the parsing service receives per upload (result
//! mode, vision model, worker hint, instruction prompt, separator) lives
//! here and never changes between documents — the orchestration issues the
//! same request shape for every file.

use crate::credentials::Credentials;
use crate::error::BatchError;
use crate::progress::ProgressCallback;
use crate::prompts::CLINICAL_PARSING_INSTRUCTION;
use std::fmt;

/// Default page/document separator, between pages within one document and
/// between documents in the master file.
pub const DEFAULT_PAGE_SEPARATOR: &str = "\n---\n";

/// Default base URL of the hosted parsing service.
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

/// Configuration for one batch run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use guideline2txt::{BatchConfig, Credentials};
///
/// let config = BatchConfig::builder()
///     .credentials(Credentials::from_env())
///     .vision_model("openai-gpt4o")
///     .num_workers(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Separator inserted between page texts and between documents in the
    /// master artifact. Default: `"\n---\n"`.
    pub page_separator: String,

    /// Base URL of the parsing service. Default: the hosted endpoint.
    /// Overridable for self-hosted deployments and tests.
    pub base_url: String,

    /// Credentials for the parsing service and its vision model.
    pub credentials: Credentials,

    /// Vendor multimodal model used for image-description enrichment.
    /// Default: `"openai-gpt4o"`.
    pub vision_model: String,

    /// Worker-count hint forwarded to the service. Default: 4.
    ///
    /// Parallelism is entirely the service's concern; the local batch stays
    /// sequential regardless of this value.
    pub num_workers: usize,

    /// Ask the service for verbose job logging. Default: false.
    pub verbose: bool,

    /// Natural-language instruction steering extraction fidelity.
    /// If None, the built-in clinical-guidance instruction is used.
    pub parsing_instruction: Option<String>,

    /// Per-request HTTP timeout in seconds (upload and each poll). Default: 120.
    pub request_timeout_secs: u64,

    /// Total time to wait for one document's parse job in seconds. Default: 600.
    ///
    /// Clinical guidelines run long — a 100-page double-column document with
    /// image descriptions can take several minutes on the service side.
    pub job_timeout_secs: u64,

    /// Delay between job-status polls in milliseconds. Default: 2000.
    pub poll_interval_ms: u64,

    /// Optional progress callback fired per document and per master write.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            page_separator: DEFAULT_PAGE_SEPARATOR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            vision_model: "openai-gpt4o".to_string(),
            num_workers: 4,
            verbose: false,
            parsing_instruction: None,
            request_timeout_secs: 120,
            job_timeout_secs: 600,
            poll_interval_ms: 2000,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("page_separator", &self.page_separator)
            .field("base_url", &self.base_url)
            .field("vision_model", &self.vision_model)
            .field("num_workers", &self.num_workers)
            .field("verbose", &self.verbose)
            .field(
                "parsing_instruction",
                &self.parsing_instruction.as_ref().map(|s| s.len()),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("job_timeout_secs", &self.job_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// The instruction prompt to send: the caller's override or the
    /// built-in clinical-guidance instruction.
    pub fn instruction(&self) -> &str {
        self.parsing_instruction
            .as_deref()
            .unwrap_or(CLINICAL_PARSING_INSTRUCTION)
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn page_separator(mut self, sep: impl Into<String>) -> Self {
        self.config.page_separator = sep.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn credentials(mut self, creds: Credentials) -> Self {
        self.config.credentials = creds;
        self
    }

    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config.vision_model = model.into();
        self
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.config.num_workers = n.max(1);
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.config.verbose = v;
        self
    }

    pub fn parsing_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.parsing_instruction = Some(instruction.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn job_timeout_secs(mut self, secs: u64) -> Self {
        self.config.job_timeout_secs = secs.max(1);
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms.max(100);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.page_separator.is_empty() {
            return Err(BatchError::InvalidConfig(
                "Page separator must not be empty".into(),
            ));
        }
        if c.base_url.is_empty() {
            return Err(BatchError::InvalidConfig(
                "Service base URL must not be empty".into(),
            ));
        }
        if c.poll_interval_ms > c.job_timeout_secs.saturating_mul(1000) {
            return Err(BatchError::InvalidConfig(format!(
                "Poll interval ({}ms) exceeds the job timeout ({}s)",
                c.poll_interval_ms, c.job_timeout_secs
            )));
        }
        Ok(self.config)
    }
}
