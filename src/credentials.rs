//! Process-wide credentials for the external collaborators.
//!
//! Two keys are involved: one for the parsing service itself and one for the
//! vision model the service calls out to for image descriptions. Both are
//! read from the environment exactly once, at startup, into an immutable
//! [`Credentials`] value that is passed explicitly into
//! [`crate::config::BatchConfig`] — no ambient `env::var` lookups happen
//! later in the run.
//!
//! Absence of a key is deliberately NOT validated here: an empty bearer
//! token produces an authorization failure on the first upload, which is
//! reported per document like any other extraction failure. That keeps the
//! failure semantics uniform (no special startup path) and matches how the
//! hosted service actually behaves.

/// Environment variable holding the parsing-service API key.
pub const PARSE_KEY_VAR: &str = "LLAMA_CLOUD_API_KEY";

/// Environment variable holding the vision-model API key.
pub const VISION_KEY_VAR: &str = "OPENAI_API_KEY";

/// Immutable credential pair for the parsing service and its vision model.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Bearer token for the parsing service.
    pub parse_api_key: String,
    /// API key forwarded to the service for the multimodal vision model.
    pub vision_api_key: String,
}

impl Credentials {
    /// Read both keys from the environment. Missing variables become empty
    /// strings; any resulting 401/403 surfaces later as a per-document
    /// [`crate::error::ParseError::Auth`].
    pub fn from_env() -> Self {
        Self {
            parse_api_key: std::env::var(PARSE_KEY_VAR).unwrap_or_default(),
            vision_api_key: std::env::var(VISION_KEY_VAR).unwrap_or_default(),
        }
    }

    /// Construct explicit credentials (tests, embedding callers).
    pub fn new(parse_api_key: impl Into<String>, vision_api_key: impl Into<String>) -> Self {
        Self {
            parse_api_key: parse_api_key.into(),
            vision_api_key: vision_api_key.into(),
        }
    }
}
