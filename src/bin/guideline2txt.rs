//! CLI binary for guideline2txt.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`,
//! renders per-document progress, and prints a run summary.

use anyhow::{Context, Result};
use clap::Parser;
use guideline2txt::{
    process_guideline, run_batch, BatchConfig, BatchProgressCallback, BatchReport, Credentials,
    ProgressCallback, RemoteParser, SharedParser,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one progress bar per guideline, a log line
/// per document. Documents are processed strictly in order, so no
/// out-of-order handling is needed — the mutex only satisfies `Sync`.
struct CliProgressCallback {
    bar: Mutex<ProgressBar>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(ProgressBar::hidden()),
        })
    }

    fn styled_bar(total: usize, guideline: &str) -> ProgressBar {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix(guideline.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_guideline_start(&self, guideline: &str, total_documents: usize) {
        let bar = Self::styled_bar(total_documents, guideline);
        bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Converting guideline '{guideline}' ({total_documents} documents)…"
            ))
        ));
        *self.bar.lock().unwrap() = bar;
    }

    fn on_document_start(&self, _guideline: &str, file_name: &str) {
        self.bar
            .lock()
            .unwrap()
            .set_message(file_name.to_string());
    }

    fn on_document_complete(&self, _guideline: &str, file_name: &str, text_len: usize) {
        let bar = self.bar.lock().unwrap();
        bar.println(format!(
            "  {} {:<32}  {}",
            green("✓"),
            file_name,
            dim(&format!("{text_len:>7} chars")),
        ));
        bar.inc(1);
    }

    fn on_document_skipped(&self, _guideline: &str, file_name: &str, reason: &str) {
        let msg = truncate_message(reason, 100);
        let bar = self.bar.lock().unwrap();
        bar.println(format!("  {} {:<32}  {}", red("✗"), file_name, red(&msg)));
        bar.inc(1);
    }

    fn on_master_written(&self, guideline: &str, documents_included: usize, text_len: usize) {
        let bar = self.bar.lock().unwrap();
        bar.finish_and_clear();
        eprintln!(
            "{} {}_combined.txt  {}",
            green("✔"),
            guideline,
            dim(&format!("{documents_included} documents, {text_len} bytes")),
        );
    }
}

/// Truncate a long error message to at most `max` characters, appending an
/// ellipsis. Counts chars, not bytes — service error bodies and file names
/// can contain multi-byte UTF-8, and a byte slice could split a character.
fn truncate_message(reason: &str, max: usize) -> String {
    if reason.chars().count() > max {
        let mut msg: String = reason.chars().take(max - 1).collect();
        msg.push('\u{2026}');
        msg
    } else {
        reason.to_string()
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every guideline folder under ./pdfs into ./output
  guideline2txt

  # Explicit directories
  guideline2txt ./guidelines -o ./extracted

  # Re-run a single guideline folder
  guideline2txt --guideline sepsis_2024

  # Different vision model, more service-side workers
  guideline2txt --model openai-gpt4o --workers 8

  # Custom parsing instruction
  guideline2txt --instruction-file prompts/cardiology.txt

  # Machine-readable summary
  guideline2txt --json > report.json

INPUT LAYOUT:
  <input>/<guideline_name>/*.pdf      one folder per guideline; nesting
                                      beyond one level is not traversed

OUTPUT LAYOUT:
  <output>/<guideline_name>/<doc>.txt               one file per parsed PDF
  <output>/<guideline_name>/<guideline_name>_combined.txt

ENVIRONMENT VARIABLES:
  LLAMA_CLOUD_API_KEY     Parsing-service API key
  OPENAI_API_KEY          Vision-model API key (image descriptions)

  Missing keys are not checked at startup: the first upload fails with an
  authorization error, which is logged per document like any other failure.

FAILURE SEMANTICS:
  A document that fails or comes back empty is skipped with a logged line;
  the batch continues and always exits 0. The master file contains only
  the documents that succeeded (possibly none). Use --json and inspect
  stats.failed_documents when you need to act on failures.
"#;

/// Batch-convert clinical guideline PDFs to plain text.
#[derive(Parser, Debug)]
#[command(
    name = "guideline2txt",
    version,
    about = "Batch-convert clinical guideline PDFs to plain text via a hosted parsing service",
    long_about = "Walk an input directory of guideline folders, send each PDF to a hosted \
document-parsing service (multimodal, clinical-guidance instruction prompt), write one text \
file per document, and concatenate each guideline's successful extractions into a single \
combined file.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input root: one subdirectory per guideline, PDFs inside.
    #[arg(default_value = "./pdfs")]
    input: PathBuf,

    /// Output root; mirrors the guideline folder names.
    #[arg(short, long, env = "GUIDELINE2TXT_OUTPUT", default_value = "./output")]
    output: PathBuf,

    /// Process only this guideline folder.
    #[arg(long, env = "GUIDELINE2TXT_GUIDELINE")]
    guideline: Option<String>,

    /// Vendor multimodal model for image descriptions.
    #[arg(long, env = "GUIDELINE2TXT_MODEL", default_value = "openai-gpt4o")]
    model: String,

    /// Worker-count hint forwarded to the parsing service.
    #[arg(short, long, env = "GUIDELINE2TXT_WORKERS", default_value_t = 4)]
    workers: usize,

    /// Separator between pages and between documents (default: "\n---\n").
    #[arg(long, env = "GUIDELINE2TXT_SEPARATOR")]
    separator: Option<String>,

    /// Path to a text file containing a custom parsing instruction.
    #[arg(long, env = "GUIDELINE2TXT_INSTRUCTION_FILE")]
    instruction_file: Option<PathBuf>,

    /// Base URL of the parsing service (self-hosted deployments).
    #[arg(long, env = "GUIDELINE2TXT_BASE_URL")]
    base_url: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "GUIDELINE2TXT_REQUEST_TIMEOUT", default_value_t = 120)]
    request_timeout: u64,

    /// Total wait per document's parse job in seconds.
    #[arg(long, env = "GUIDELINE2TXT_JOB_TIMEOUT", default_value_t = 600)]
    job_timeout: u64,

    /// Delay between job-status polls in milliseconds.
    #[arg(long, env = "GUIDELINE2TXT_POLL_INTERVAL", default_value_t = 2000)]
    poll_interval: u64,

    /// Print the batch report as JSON instead of the human summary.
    #[arg(long, env = "GUIDELINE2TXT_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "GUIDELINE2TXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs (also asks the service for verbose job logs).
    #[arg(short, long, env = "GUIDELINE2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GUIDELINE2TXT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar and its println lines carry the per-document feedback.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;
    let parser: SharedParser =
        Arc::new(RemoteParser::new(&config).context("Failed to initialise the parsing client")?);

    // ── Run the batch ────────────────────────────────────────────────────
    let report = match cli.guideline {
        Some(ref name) => {
            let start = std::time::Instant::now();
            let g = process_guideline(name, &cli.input, &cli.output, &parser, &config)
                .await
                .with_context(|| format!("Failed to convert guideline '{name}'"))?;
            BatchReport::from_guidelines(vec![g], start.elapsed().as_millis() as u64)
        }
        None => run_batch(&cli.input, &cli.output, &parser, &config)
            .await
            .context("Batch conversion failed")?,
    };

    // ── Summary ──────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        let s = &report.stats;
        eprintln!(
            "{}  {} guideline(s), {}/{} documents converted in {}ms",
            if s.failed_documents == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            s.guidelines,
            bold(&s.converted_documents.to_string()),
            s.total_documents,
            s.total_duration_ms,
        );
        if s.empty_documents > 0 {
            eprintln!(
                "   {} document(s) came back empty and were skipped",
                s.empty_documents
            );
        }
        if s.failed_documents > 0 {
            eprintln!("   {} document(s) failed", red(&s.failed_documents.to_string()));
        }
        eprintln!("   {} written", dim(&format!("{} bytes", s.bytes_written)));
    }

    // Per-document failures never change the exit status; the run itself
    // succeeded. Fatal filesystem/config errors bailed out above.
    Ok(())
}

/// Map CLI args to `BatchConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .credentials(Credentials::from_env())
        .vision_model(cli.model.clone())
        .num_workers(cli.workers)
        .verbose(cli.verbose)
        .request_timeout_secs(cli.request_timeout)
        .job_timeout_secs(cli.job_timeout)
        .poll_interval_ms(cli.poll_interval);

    if let Some(ref sep) = cli.separator {
        builder = builder.page_separator(sep.clone());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ref path) = cli.instruction_file {
        let instruction = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read parsing instruction from {path:?}"))?;
        builder = builder.parsing_instruction(instruction);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
