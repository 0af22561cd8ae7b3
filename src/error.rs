//! Error types for the guideline2txt library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the batch cannot proceed at all (missing
//!   input root, invalid configuration, unwritable output directory).
//!   Returned as `Err(BatchError)` from [`crate::batch::run_batch`].
//!
//! * [`ParseError`] — **Non-fatal**: extraction failed for a single document
//!   (service error, timeout, empty result) but every other document is
//!   fine. Recorded in [`crate::report::DocumentOutcome`] so callers can
//!   inspect partial success rather than losing a whole guideline to one
//!   bad PDF.
//!
//! The separation encodes the batch contract directly in the types: no
//! `ParseError` ever crosses a document boundary, and the worst outcome for
//! a guideline whose documents all fail is an empty master file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the guideline2txt library.
///
/// Per-document failures use [`ParseError`] and are recorded in
/// [`crate::report::DocumentOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input root directory does not exist or is not a directory.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is a directory.")]
    InputRootNotFound { path: PathBuf },

    /// Listing a directory under the input root failed.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create an output directory or write an artifact.
    ///
    /// Filesystem errors on the output side terminate the run: recovering
    /// from an unwritable output root is out of scope.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal extraction failure for a single source document.
///
/// Every variant is recoverable at the batch level: the document is logged
/// and skipped, and processing continues with the next file. There is no
/// retry — the original behaviour the spec preserves.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ParseError {
    /// The service returned zero pages — the document may be empty or
    /// unsupported. Surfaced as a warning, not an error.
    #[error("No text extracted from '{file}' (empty or unsupported document)")]
    Empty { file: String },

    /// Polling exceeded the configured job timeout.
    #[error("Parse job for '{file}' timed out after {secs}s")]
    Timeout { file: String, secs: u64 },

    /// The service rejected the credentials (HTTP 401/403).
    #[error("Authorization failed for '{file}': {detail}")]
    Auth { file: String, detail: String },

    /// Any other non-success HTTP response from the service.
    #[error("Parsing service returned HTTP {status} for '{file}': {detail}")]
    Http {
        file: String,
        status: u16,
        detail: String,
    },

    /// The job reached a terminal ERROR status on the service side.
    #[error("Parsing service failed on '{file}': {detail}")]
    Service { file: String, detail: String },

    /// Request-level network failure (connect, DNS, mid-body disconnect).
    #[error("Network error while parsing '{file}': {detail}")]
    Network { file: String, detail: String },

    /// Reading the PDF from disk failed.
    #[error("Failed to read '{file}': {detail}")]
    Read { file: String, detail: String },
}

impl ParseError {
    /// The source file this failure belongs to.
    pub fn file(&self) -> &str {
        match self {
            ParseError::Empty { file }
            | ParseError::Timeout { file, .. }
            | ParseError::Auth { file, .. }
            | ParseError::Http { file, .. }
            | ParseError::Service { file, .. }
            | ParseError::Network { file, .. }
            | ParseError::Read { file, .. } => file,
        }
    }

    /// Empty extractions are warnings; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, ParseError::Empty { .. })
    }
}
