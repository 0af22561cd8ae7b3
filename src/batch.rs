//! Batch orchestration: walk guidelines, parse documents, write artifacts.
//!
//! ## Control flow
//!
//! ```text
//! input_root/
//!   sepsis/           ──▶ process_guideline("sepsis")
//!     1.pdf               ├─ parse ─▶ output_root/sepsis/1.txt
//!     2.pdf               ├─ parse ─▶ output_root/sepsis/2.txt
//!     notes.txt           │  (ignored — not a PDF)
//!                         └─ join   ─▶ output_root/sepsis/sepsis_combined.txt
//! ```
//!
//! Everything is strictly sequential: one guideline at a time, one document
//! at a time, one awaited parse call per document. The master artifact's
//! order depends on it. Per-document failures are logged and skipped; only
//! filesystem errors on the output side are fatal.

use crate::config::BatchConfig;
use crate::error::{BatchError, ParseError};
use crate::natsort::natural_key;
use crate::parser::SharedParser;
use crate::report::{BatchReport, DocumentOutcome, GuidelineReport};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Process every guideline folder under `input_root`.
///
/// Returns a [`BatchReport`] describing every document's outcome. Only
/// filesystem errors are fatal; a guideline whose documents all fail still
/// yields an empty master file and a complete report entry.
pub async fn run_batch(
    input_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    parser: &SharedParser,
    config: &BatchConfig,
) -> Result<BatchReport, BatchError> {
    let start = Instant::now();
    let input_root = input_root.as_ref();
    let output_root = output_root.as_ref();

    let names = list_guidelines(input_root)?;
    info!(
        "Found {} guideline folder(s) under {}",
        names.len(),
        input_root.display()
    );

    let mut guidelines = Vec::with_capacity(names.len());
    for name in &names {
        let report = process_guideline(name, input_root, output_root, parser, config).await?;
        guidelines.push(report);
    }

    Ok(BatchReport::from_guidelines(
        guidelines,
        start.elapsed().as_millis() as u64,
    ))
}

/// Enumerate guideline names: the immediate subdirectories of `input_root`.
///
/// Sorted by name for stable log output; processing order carries no
/// semantic weight since guidelines are independent. Plain files at the top
/// level are ignored.
pub fn list_guidelines(input_root: &Path) -> Result<Vec<String>, BatchError> {
    if !input_root.is_dir() {
        return Err(BatchError::InputRootNotFound {
            path: input_root.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(input_root).map_err(|e| BatchError::ReadDirFailed {
        path: input_root.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BatchError::ReadDirFailed {
            path: input_root.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// List the PDF file names directly inside a guideline folder, in
/// natural-sort order. Non-PDF files and nested directories are ignored
/// entirely.
pub fn list_documents(guideline_path: &Path) -> Result<Vec<String>, BatchError> {
    let entries = std::fs::read_dir(guideline_path).map_err(|e| BatchError::ReadDirFailed {
        path: guideline_path.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BatchError::ReadDirFailed {
            path: guideline_path.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let is_pdf = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort_by_key(|name| natural_key(name));
    Ok(files)
}

/// Convert one guideline folder: per-file artifacts plus the master file.
///
/// The master artifact is written unconditionally — an empty master file for
/// a guideline whose documents all failed is correct output, not an error.
pub async fn process_guideline(
    name: &str,
    input_root: &Path,
    output_root: &Path,
    parser: &SharedParser,
    config: &BatchConfig,
) -> Result<GuidelineReport, BatchError> {
    let guideline_path = input_root.join(name);
    let output_path = output_root.join(name);

    tokio::fs::create_dir_all(&output_path)
        .await
        .map_err(|e| BatchError::OutputWriteFailed {
            path: output_path.clone(),
            source: e,
        })?;

    let files = list_documents(&guideline_path)?;
    info!("Guideline '{}': {} PDF(s)", name, files.len());
    if let Some(ref cb) = config.progress_callback {
        cb.on_guideline_start(name, files.len());
    }

    let separator = config.page_separator.as_str();
    let mut combined_texts: Vec<String> = Vec::new();
    let mut documents = Vec::with_capacity(files.len());

    for file_name in &files {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(name, file_name);
        }
        let start = Instant::now();

        let outcome = match extract_document(&guideline_path, file_name, parser).await {
            Ok(pages) => {
                let text = pages.join(separator);
                let txt_path = output_path.join(artifact_name(file_name));
                tokio::fs::write(&txt_path, &text).await.map_err(|e| {
                    BatchError::OutputWriteFailed {
                        path: txt_path.clone(),
                        source: e,
                    }
                })?;

                info!("Text extracted and saved to {}", txt_path.display());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(name, file_name, text.len());
                }

                let outcome = DocumentOutcome {
                    file_name: file_name.clone(),
                    text_len: text.len(),
                    pages: pages.len(),
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: None,
                };
                combined_texts.push(text);
                outcome
            }
            Err(e) => {
                if e.is_warning() {
                    warn!("{}", e);
                } else {
                    error!("Error while parsing '{}': {}", file_name, e);
                }
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_skipped(name, file_name, &e.to_string());
                }
                DocumentOutcome {
                    file_name: file_name.clone(),
                    text_len: 0,
                    pages: 0,
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: Some(e),
                }
            }
        };
        documents.push(outcome);
    }

    // Master artifact: successful documents only, in processing order.
    let master = combined_texts.join(separator);
    let master_path = output_path.join(format!("{name}_combined.txt"));
    tokio::fs::write(&master_path, &master)
        .await
        .map_err(|e| BatchError::OutputWriteFailed {
            path: master_path.clone(),
            source: e,
        })?;

    info!("Master file saved to {}", master_path.display());
    if let Some(ref cb) = config.progress_callback {
        cb.on_master_written(name, combined_texts.len(), master.len());
    }

    Ok(GuidelineReport {
        name: name.to_string(),
        documents,
        master_len: master.len(),
    })
}

/// Read one PDF and send it through the parser.
///
/// The file handle is scoped to the `read` call — bytes are in memory
/// before the request goes out, and nothing stays open while polling.
/// An empty page list is normalised to [`ParseError::Empty`] here so the
/// caller has a single skip path.
async fn extract_document(
    guideline_path: &Path,
    file_name: &str,
    parser: &SharedParser,
) -> Result<Vec<String>, ParseError> {
    let pdf_path = guideline_path.join(file_name);
    let bytes = tokio::fs::read(&pdf_path)
        .await
        .map_err(|e| ParseError::Read {
            file: file_name.to_string(),
            detail: e.to_string(),
        })?;

    let pages = parser.parse(bytes, file_name).await?;
    if pages.is_empty() {
        return Err(ParseError::Empty {
            file: file_name.to_string(),
        });
    }
    Ok(pages)
}

/// `dose_chart.pdf` → `dose_chart.txt`.
fn artifact_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    format!("{stem}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_swaps_extension() {
        assert_eq!(artifact_name("1.pdf"), "1.txt");
        assert_eq!(artifact_name("dose_chart.PDF"), "dose_chart.txt");
        assert_eq!(artifact_name("v1.2.pdf"), "v1.2.txt");
    }

    #[test]
    fn list_documents_filters_and_orders() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["p10.pdf", "p2.pdf", "notes.txt", "p1.pdf", "scan.PDF"] {
            std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_documents(dir.path()).unwrap();
        assert_eq!(files, vec!["p1.pdf", "p2.pdf", "p10.pdf", "scan.PDF"]);
    }

    #[test]
    fn list_guidelines_skips_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("beta")).unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        std::fs::write(dir.path().join("stray.pdf"), b"%PDF").unwrap();

        let names = list_guidelines(dir.path()).unwrap();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn missing_input_root_is_fatal() {
        let err = list_guidelines(Path::new("/nonexistent/guidelines")).unwrap_err();
        assert!(matches!(err, BatchError::InputRootNotFound { .. }));
    }
}
