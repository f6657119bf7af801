//! CLI binary for scidoc-analyzer.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig`, drives one batch and reports the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scidoc_analyzer::{
    AnalysisConfig, Analyzer, BatchProgressCallback, ProgressCallback, ResultRecord,
    StopwordSource,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
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

/// Terminal progress callback: one bar across the batch plus a log line per
/// finished document.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} docs  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        self.bar.set_length(total_documents as u64);
        self.bar.set_prefix("Analyzing");
    }

    fn on_document_start(&self, _index: usize, _total: usize, file: &str) {
        self.bar.set_message(file.to_string());
    }

    fn on_document_complete(&self, _index: usize, _total: usize, record: &ResultRecord) {
        let verdict = if record.is_scientific_article {
            cyan("scientific")
        } else {
            dim("other")
        };
        self.bar.println(format!(
            "  {} {:<40} {}  {}",
            green("✓"),
            record.file,
            verdict,
            dim(&format!(
                "{} ¶  {} words  valid={}",
                record.paragraphs, record.word_count, record.valid
            )),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, _index: usize, _total: usize, file: &str, error: &str) {
        let msg = match error.char_indices().nth(80) {
            Some((i, _)) => format!("{}\u{2026}", &error[..i]),
            None => error.to_string(),
        };
        self.bar
            .println(format!("  {} {:<40} {}", red("✗"), file, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, succeeded: usize) {
        self.bar.finish_and_clear();
        let failed = total_documents.saturating_sub(succeeded);
        if failed == 0 {
            eprintln!("{} {} documents analyzed", green("✔"), bold(&succeeded.to_string()));
        } else {
            eprintln!(
                "{} {}/{} documents analyzed  ({} failed)",
                cyan("⚠"),
                bold(&succeeded.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze every PDF under ./papers, artifacts in ./outputs
  scidoc papers/

  # Single file
  scidoc scan.pdf

  # Include scanned images as well as PDFs
  scidoc --ext png --ext jpg inbox/

  # Custom stopword corpus, record failures instead of aborting
  scidoc --stopwords english.txt --keep-going archive/

OUTPUT:
  <output-dir>/<file name>.json    one record per document
  <output-dir>/all_results.json    every record, in discovery order

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY     API key for the summarization service (required)
  PDFIUM_LIB_PATH    Path to an existing libpdfium
  RUST_LOG           Log filter (overrides --verbose / --quiet)
"#;

/// Classify and summarize scanned documents.
#[derive(Parser, Debug)]
#[command(
    name = "scidoc",
    version,
    about = "OCR scanned documents, flag scientific articles and summarize them with an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory to scan recursively, or a single document.
    root: PathBuf,

    /// Directory receiving the JSON artifacts.
    #[arg(short, long, env = "SCIDOC_OUTPUT_DIR", default_value = "outputs")]
    output_dir: PathBuf,

    /// Summarization model ID.
    #[arg(long, env = "SCIDOC_MODEL", default_value = scidoc_analyzer::config::DEFAULT_MODEL)]
    model: String,

    /// LLM provider name.
    #[arg(long, env = "SCIDOC_PROVIDER", default_value = scidoc_analyzer::config::DEFAULT_PROVIDER)]
    provider: String,

    /// Environment variable holding the API key.
    #[arg(long, default_value = scidoc_analyzer::config::DEFAULT_API_KEY_ENV)]
    api_key_env: String,

    /// Rasterization DPI for PDF pages (72–600).
    #[arg(long, env = "SCIDOC_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Characters of transcription sent to the summarizer.
    #[arg(long, env = "SCIDOC_MAX_CHARS", default_value_t = 12_000)]
    max_chars: usize,

    /// Additional eligible extension (repeatable). PDF is always included.
    #[arg(long = "ext", env = "SCIDOC_EXTENSIONS", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Stopword corpus file (one word per line).
    #[arg(long, env = "SCIDOC_STOPWORDS", conflicts_with = "stopwords_url")]
    stopwords: Option<PathBuf>,

    /// Download the stopword corpus from this URL.
    #[arg(long, env = "SCIDOC_STOPWORDS_URL")]
    stopwords_url: Option<String>,

    /// Cache directory for a downloaded stopword corpus.
    #[arg(long, env = "SCIDOC_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Tesseract language code.
    #[arg(long, env = "SCIDOC_LANG", default_value = "eng")]
    lang: String,

    /// Tesseract executable.
    #[arg(long, env = "SCIDOC_TESSERACT", default_value = "tesseract")]
    tesseract: String,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Record failing documents and continue instead of aborting.
    #[arg(long, env = "SCIDOC_KEEP_GOING")]
    keep_going: bool,

    /// Also print the batch as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "SCIDOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCIDOC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCIDOC_QUIET")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar carries user feedback; library INFO lines would tear it.
    let show_progress = !cli.quiet && !cli.no_progress;
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

    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn BatchProgressCallback>);

    let config = build_config(&cli, progress_cb)?;

    // Credential check happens here, before anything is discovered.
    let analyzer = Analyzer::new(config).context("Startup failed")?;

    let outcome = analyzer.run(&cli.root).await;
    // Empty or aborted batches never reach on_batch_complete.
    if let Some(ref cb) = cli_progress {
        cb.bar.finish_and_clear();
    }
    let batch = outcome.with_context(|| format!("Analysis of {} failed", cli.root.display()))?;

    if batch.is_empty() {
        eprintln!(
            "No eligible documents found under {} (extensions: {})",
            cli.root.display(),
            analyzer.config().extensions.join(", ")
        );
        return Ok(());
    }

    if cli.json {
        let json =
            serde_json::to_string_pretty(&batch.records).context("Failed to serialise output")?;
        println!("{json}");
    }

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} documents  {} scientific  {} valid  {}ms  →  {}",
            if batch.stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            batch.stats.processed,
            batch.stats.discovered,
            batch.stats.scientific,
            batch.stats.valid,
            batch.stats.duration_ms,
            bold(&analyzer.config().output_dir.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<AnalysisConfig> {
    let stopwords = match (&cli.stopwords, &cli.stopwords_url) {
        (Some(path), _) => StopwordSource::File(path.clone()),
        (None, Some(url)) => StopwordSource::Url(url.clone()),
        (None, None) => StopwordSource::Embedded,
    };

    let mut builder = AnalysisConfig::builder()
        .output_dir(&cli.output_dir)
        .model(&cli.model)
        .provider_name(&cli.provider)
        .api_key_env(&cli.api_key_env)
        .dpi(cli.dpi)
        .max_input_chars(cli.max_chars)
        .stopwords(stopwords)
        .ocr_language(&cli.lang)
        .tesseract_cmd(&cli.tesseract)
        .keep_going(cli.keep_going);

    for ext in &cli.extensions {
        builder = builder.extension(ext);
    }
    if let Some(ref dir) = cli.cache_dir {
        builder = builder.stopword_cache_dir(dir);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
