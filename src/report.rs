//! Result and summary types for a batch run.
//!
//! The batch never aborts on a per-document failure, so its return value
//! must carry partial-success information: which documents converted, which
//! were skipped and why, and aggregate counts for the CLI summary line and
//! `--json` output.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// Outcome of one source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// PDF file name within the guideline folder.
    pub file_name: String,

    /// Byte length of the extracted text (0 when skipped).
    pub text_len: usize,

    /// Number of page segments the service returned.
    pub pages: usize,

    /// Wall-clock time spent on this document in milliseconds.
    pub duration_ms: u64,

    /// Set when the document was skipped; `None` means the per-file
    /// artifact was written and its text is part of the master artifact.
    pub error: Option<ParseError>,
}

impl DocumentOutcome {
    /// Whether this document contributed text to the master artifact.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-guideline results: one entry per PDF, in natural-sort order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelineReport {
    /// Guideline folder name.
    pub name: String,

    /// Document outcomes in processing (natural-sort) order.
    pub documents: Vec<DocumentOutcome>,

    /// Byte length of the master artifact.
    pub master_len: usize,
}

impl GuidelineReport {
    /// Count of documents whose text reached the master artifact.
    pub fn converted(&self) -> usize {
        self.documents.iter().filter(|d| d.succeeded()).count()
    }

    /// Count of skipped documents (empty extraction or failure).
    pub fn skipped(&self) -> usize {
        self.documents.len() - self.converted()
    }
}

/// Aggregate counters across all guidelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    pub guidelines: usize,
    pub total_documents: usize,
    pub converted_documents: usize,
    pub failed_documents: usize,
    /// Documents the service returned no text for (warnings, not errors).
    pub empty_documents: usize,
    /// Total bytes written across per-file and master artifacts.
    pub bytes_written: u64,
    pub total_duration_ms: u64,
}

/// Full result of [`crate::batch::run_batch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub guidelines: Vec<GuidelineReport>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// Assemble aggregate stats from per-guideline reports.
    pub fn from_guidelines(guidelines: Vec<GuidelineReport>, total_duration_ms: u64) -> Self {
        let mut stats = BatchStats {
            guidelines: guidelines.len(),
            total_duration_ms,
            ..Default::default()
        };
        for g in &guidelines {
            stats.total_documents += g.documents.len();
            stats.bytes_written += g.master_len as u64;
            for d in &g.documents {
                match &d.error {
                    None => {
                        stats.converted_documents += 1;
                        stats.bytes_written += d.text_len as u64;
                    }
                    Some(e) if e.is_warning() => stats.empty_documents += 1,
                    Some(_) => stats.failed_documents += 1,
                }
            }
        }
        Self { guidelines, stats }
    }
}
