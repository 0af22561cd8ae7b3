//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! events as the batch walks guidelines and documents.
//!
//! The callback approach keeps the library ignorant of how the host
//! application communicates: the CLI forwards events to an indicatif bar,
//! a server could forward them to a channel or a database row. All methods
//! have default no-op implementations so callers only override what they
//! care about. Processing is sequential, so implementations are never
//! called concurrently, but the trait is `Send + Sync` to stay usable from
//! spawned tasks.

use std::sync::Arc;

/// Shared handle to a progress callback.
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

/// Called by the batch as it processes guidelines and documents.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once per guideline, before its first document.
    ///
    /// `total_documents` counts the PDF files found in the folder.
    fn on_guideline_start(&self, guideline: &str, total_documents: usize) {
        let _ = (guideline, total_documents);
    }

    /// Called just before the parse request for a document is sent.
    fn on_document_start(&self, guideline: &str, file_name: &str) {
        let _ = (guideline, file_name);
    }

    /// Called when a document's text artifact has been written.
    ///
    /// `text_len` is the byte length of the extracted text.
    fn on_document_complete(&self, guideline: &str, file_name: &str, text_len: usize) {
        let _ = (guideline, file_name, text_len);
    }

    /// Called when a document was skipped (empty extraction or failure).
    fn on_document_skipped(&self, guideline: &str, file_name: &str, reason: &str) {
        let _ = (guideline, file_name, reason);
    }

    /// Called after the guideline's master artifact has been written.
    fn on_master_written(&self, guideline: &str, documents_included: usize, text_len: usize) {
        let _ = (guideline, documents_included, text_len);
    }
}
