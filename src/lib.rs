//! # guideline2txt
//!
//! Batch-convert clinical guideline PDFs into plain-text files using a
//! hosted document-parsing service, then concatenate per-document outputs
//! into a per-guideline master file.
//!
//! ## Why this crate?
//!
//! Clinical guidance PDFs are hostile to local extraction tools: double
//! columns, named dosage tables, flowcharts, and footnotes come out garbled
//! or out of reading order. The heavy lifting here is delegated to a remote
//! parsing service configured with a genre-specific instruction prompt and
//! multimodal image descriptions; the crate's own job is the orchestration
//! around it — directory traversal, natural-order sorting, per-document
//! error recovery, and text concatenation.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input_root/<guideline>/*.pdf
//!  │
//!  ├─ 1. Discover  list guideline folders, natural-sort their PDFs
//!  ├─ 2. Parse     one blocking request per PDF to the remote service
//!  ├─ 3. Persist   <base>.txt per document, pages joined by "\n---\n"
//!  └─ 4. Combine   <guideline>_combined.txt from successful documents
//! ```
//!
//! A failed or empty extraction skips that document with a logged warning
//! or error; the batch never aborts, and a guideline whose documents all
//! fail still produces an (empty) master file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guideline2txt::{run_batch, BatchConfig, Credentials, RemoteParser, SharedParser};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Keys from LLAMA_CLOUD_API_KEY / OPENAI_API_KEY
//!     let config = BatchConfig::builder()
//!         .credentials(Credentials::from_env())
//!         .build()?;
//!     let parser: SharedParser = Arc::new(RemoteParser::new(&config)?);
//!     let report = run_batch("./pdfs", "./output", &parser, &config).await?;
//!     eprintln!(
//!         "{}/{} documents converted",
//!         report.stats.converted_documents, report.stats.total_documents
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `guideline2txt` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! guideline2txt = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod credentials;
pub mod error;
pub mod natsort;
pub mod parser;
pub mod progress;
pub mod prompts;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{list_guidelines, process_guideline, run_batch};
pub use config::{BatchConfig, BatchConfigBuilder, DEFAULT_BASE_URL, DEFAULT_PAGE_SEPARATOR};
pub use credentials::Credentials;
pub use error::{BatchError, ParseError};
pub use natsort::{natural_key, NaturalKey};
pub use parser::{DocumentParser, RemoteParser, SharedParser};
pub use progress::{BatchProgressCallback, ProgressCallback};
pub use report::{BatchReport, BatchStats, DocumentOutcome, GuidelineReport};
