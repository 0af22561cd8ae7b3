//! Integration tests for the batch converter.
//!
//! The remote parsing service is replaced with a scripted in-memory
//! [`DocumentParser`] — the same seam a caller would use to inject a custom
//! client — so every batch property is testable hermetically: ordering,
//! artifact contents, skip semantics, overwrite behaviour.

use async_trait::async_trait;
use guideline2txt::{
    run_batch, BatchConfig, BatchProgressCallback, DocumentParser, ParseError, SharedParser,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Parser that replays canned outcomes per file name and records call order.
struct ScriptedParser {
    outcomes: HashMap<String, Result<Vec<String>, ParseError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedParser {
    fn new(outcomes: Vec<(&str, Result<Vec<String>, ParseError>)>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: outcomes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentParser for ScriptedParser {
    async fn parse(&self, _pdf_bytes: Vec<u8>, file_name: &str) -> Result<Vec<String>, ParseError> {
        self.calls.lock().unwrap().push(file_name.to_string());
        self.outcomes
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| Ok(vec![format!("text of {file_name}")]))
    }
}

fn pages(texts: &[&str]) -> Result<Vec<String>, ParseError> {
    Ok(texts.iter().map(|s| s.to_string()).collect())
}

fn failure(file: &str) -> Result<Vec<String>, ParseError> {
    Err(ParseError::Service {
        file: file.into(),
        detail: "internal parsing error".into(),
    })
}

// ── Fixture helpers ──────────────────────────────────────────────────────────

fn make_guideline(root: &Path, name: &str, files: &[&str]) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for f in files {
        std::fs::write(dir.join(f), b"%PDF-1.4 stub").unwrap();
    }
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn config() -> BatchConfig {
    BatchConfig::default()
}

// ── Core properties ──────────────────────────────────────────────────────────

#[tokio::test]
async fn success_and_failure_mix_produces_partial_master() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "sepsis", &["a1.pdf", "a2.pdf"]);

    let parser = ScriptedParser::new(vec![
        ("a1.pdf", pages(&["X", "Y"])),
        ("a2.pdf", failure("a2.pdf")),
    ]);
    let shared: SharedParser = parser.clone();

    let report = run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    let out = output.path().join("sepsis");
    assert_eq!(read(out.join("a1.txt")), "X\n---\nY");
    assert!(!out.join("a2.txt").exists(), "failed doc must leave no artifact");
    assert_eq!(read(out.join("sepsis_combined.txt")), "X\n---\nY");

    let g = &report.guidelines[0];
    assert_eq!(g.converted(), 1);
    assert_eq!(g.skipped(), 1);
    assert!(g.documents[1].error.is_some());
}

#[tokio::test]
async fn master_order_follows_natural_sort_not_listing_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    // Created deliberately out of numeric order.
    make_guideline(
        input.path(),
        "asthma",
        &["p10.pdf", "p1.pdf", "p2.pdf"],
    );

    let parser = ScriptedParser::new(vec![
        ("p1.pdf", pages(&["one"])),
        ("p2.pdf", pages(&["two"])),
        ("p10.pdf", pages(&["ten"])),
    ]);
    let shared: SharedParser = parser.clone();

    run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    assert_eq!(parser.calls(), vec!["p1.pdf", "p2.pdf", "p10.pdf"]);
    assert_eq!(
        read(output.path().join("asthma/asthma_combined.txt")),
        "one\n---\ntwo\n---\nten"
    );
}

#[tokio::test]
async fn empty_guideline_yields_empty_master() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "draft", &[]);

    let parser = ScriptedParser::new(vec![]);
    let shared: SharedParser = parser;

    let report = run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    let master = output.path().join("draft/draft_combined.txt");
    assert!(master.exists());
    assert_eq!(read(master), "");
    assert_eq!(report.guidelines[0].master_len, 0);
}

#[tokio::test]
async fn all_failures_still_write_empty_master() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "stroke", &["1.pdf", "2.pdf"]);

    let parser = ScriptedParser::new(vec![
        ("1.pdf", failure("1.pdf")),
        ("2.pdf", failure("2.pdf")),
    ]);
    let shared: SharedParser = parser;

    let report = run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    assert_eq!(read(output.path().join("stroke/stroke_combined.txt")), "");
    assert_eq!(report.stats.converted_documents, 0);
    assert_eq!(report.stats.failed_documents, 2);
}

#[tokio::test]
async fn empty_extraction_is_a_warning_skip() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "copd", &["scan.pdf", "body.pdf"]);

    let parser = ScriptedParser::new(vec![
        ("scan.pdf", pages(&[])),
        ("body.pdf", pages(&["content"])),
    ]);
    let shared: SharedParser = parser;

    let report = run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    assert!(!output.path().join("copd/scan.txt").exists());
    assert_eq!(read(output.path().join("copd/copd_combined.txt")), "content");
    assert_eq!(report.stats.empty_documents, 1);
    assert_eq!(report.stats.failed_documents, 0);

    // Natural order: body.pdf before scan.pdf.
    let scan_doc = &report.guidelines[0].documents[1];
    assert_eq!(scan_doc.file_name, "scan.pdf");
    assert!(scan_doc.error.as_ref().unwrap().is_warning());
}

#[tokio::test]
async fn rerun_overwrites_with_identical_content() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "nice", &["1.pdf"]);

    let parser = ScriptedParser::new(vec![("1.pdf", pages(&["stable text"]))]);
    let shared: SharedParser = parser;

    // Stale artifacts from an earlier (different) run must be replaced.
    let out = output.path().join("nice");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("1.txt"), "STALE").unwrap();
    std::fs::write(out.join("nice_combined.txt"), "STALE").unwrap();

    run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();
    let first = (read(out.join("1.txt")), read(out.join("nice_combined.txt")));

    run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();
    let second = (read(out.join("1.txt")), read(out.join("nice_combined.txt")));

    assert_eq!(first.0, "stable text");
    assert_eq!(first, second);
}

#[tokio::test]
async fn non_pdf_files_are_ignored_entirely() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "mixed", &["1.pdf"]);
    std::fs::write(input.path().join("mixed/readme.txt"), "notes").unwrap();
    std::fs::write(input.path().join("mixed/cover.png"), [0u8; 4]).unwrap();

    let parser = ScriptedParser::new(vec![("1.pdf", pages(&["only pdf"]))]);
    let shared: SharedParser = parser.clone();

    let report = run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    assert_eq!(parser.calls(), vec!["1.pdf"]);
    assert_eq!(report.guidelines[0].documents.len(), 1);
    assert!(!output.path().join("mixed/readme.txt").exists());
    assert!(!output.path().join("mixed/cover.txt").exists());
}

#[tokio::test]
async fn custom_separator_applies_to_pages_and_master() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "g", &["1.pdf", "2.pdf"]);

    let parser = ScriptedParser::new(vec![
        ("1.pdf", pages(&["A", "B"])),
        ("2.pdf", pages(&["C"])),
    ]);
    let shared: SharedParser = parser;

    let config = BatchConfig::builder()
        .page_separator("\n===\n")
        .build()
        .unwrap();

    run_batch(input.path(), output.path(), &shared, &config)
        .await
        .unwrap();

    assert_eq!(read(output.path().join("g/1.txt")), "A\n===\nB");
    assert_eq!(
        read(output.path().join("g/g_combined.txt")),
        "A\n===\nB\n===\nC"
    );
}

#[tokio::test]
async fn guidelines_are_processed_independently() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "bad", &["x.pdf"]);
    make_guideline(input.path(), "good", &["y.pdf"]);

    let parser = ScriptedParser::new(vec![
        ("x.pdf", failure("x.pdf")),
        ("y.pdf", pages(&["fine"])),
    ]);
    let shared: SharedParser = parser;

    let report = run_batch(input.path(), output.path(), &shared, &config())
        .await
        .unwrap();

    assert_eq!(report.stats.guidelines, 2);
    assert_eq!(read(output.path().join("bad/bad_combined.txt")), "");
    assert_eq!(read(output.path().join("good/good_combined.txt")), "fine");
}

#[tokio::test]
async fn missing_input_root_is_fatal() {
    let output = TempDir::new().unwrap();
    let parser = ScriptedParser::new(vec![]);
    let shared: SharedParser = parser;

    let err = run_batch(
        Path::new("/definitely/not/here"),
        output.path(),
        &shared,
        &config(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Input directory not found"));
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<String>>,
}

impl BatchProgressCallback for RecordingCallback {
    fn on_guideline_start(&self, guideline: &str, total_documents: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {guideline} {total_documents}"));
    }
    fn on_document_complete(&self, _guideline: &str, file_name: &str, _text_len: usize) {
        self.events.lock().unwrap().push(format!("done {file_name}"));
    }
    fn on_document_skipped(&self, _guideline: &str, file_name: &str, _reason: &str) {
        self.events.lock().unwrap().push(format!("skip {file_name}"));
    }
    fn on_master_written(&self, guideline: &str, documents_included: usize, _text_len: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("master {guideline} {documents_included}"));
    }
}

#[tokio::test]
async fn progress_callback_sees_every_document() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    make_guideline(input.path(), "g", &["1.pdf", "2.pdf"]);

    let parser = ScriptedParser::new(vec![
        ("1.pdf", pages(&["ok"])),
        ("2.pdf", failure("2.pdf")),
    ]);
    let shared: SharedParser = parser;

    let recorder = Arc::new(RecordingCallback::default());
    let config = BatchConfig::builder()
        .progress_callback(recorder.clone() as Arc<dyn BatchProgressCallback>)
        .build()
        .unwrap();

    run_batch(input.path(), output.path(), &shared, &config)
        .await
        .unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec!["start g 2", "done 1.pdf", "skip 2.pdf", "master g 1"]
    );
}
