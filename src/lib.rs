//! # scidoc-analyzer
//!
//! Triage scanned documents: transcribe them, measure their structure and
//! vocabulary, decide whether they look like scientific articles, and
//! summarize the ones that do with a generative model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! root directory
//!  │
//!  ├─ 1. Discover  recursive walk, extension filter, traversal order
//!  ├─ 2. Render    first PDF page → PNG via pdfium (images skip this)
//!  ├─ 3. OCR       tesseract transcription
//!  ├─ 4. Analyze   paragraphs, filtered word counts, top-10 words
//!  ├─ 5. Classify  section-keyword heuristic + structural validity
//!  ├─ 6. Summarize one LLM call for scientific documents, sentinel otherwise
//!  └─ 7. Persist   one JSON record per document + combined batch file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scidoc_analyzer::{analyze_batch_to_dir, AnalysisConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Requires GEMINI_API_KEY in the environment.
//!     let config = AnalysisConfig::builder().output_dir("outputs").build()?;
//!     let batch = analyze_batch_to_dir("papers/", &config).await?;
//!     for record in &batch.records {
//!         println!("{}: scientific={} valid={}", record.file,
//!             record.is_scientific_article, record.valid);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Testing without services
//!
//! Rasterizer, OCR engine and summarizer are traits ([`Rasterizer`],
//! [`TextExtractor`], [`Summarizer`]). Inject fakes through the config
//! builder and the whole pipeline runs offline; injecting a summarizer also
//! lifts the API-key requirement.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scidoc` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stopwords;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze_batch, analyze_batch_sync, analyze_batch_to_dir, require_credential, Analyzer,
};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, StopwordSource};
pub use error::{AnalysisError, DocumentFailure};
pub use output::{BatchResult, BatchStats, LexicalProfile, ResultRecord, TopWord};
pub use pipeline::discover::{discover, DocumentKind, DocumentRef};
pub use pipeline::llm::{LlmSummarizer, Summarizer};
pub use pipeline::ocr::{TesseractExtractor, TextExtractor};
pub use pipeline::render::{PdfiumRasterizer, RasterImage, Rasterizer};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use prompts::NOT_A_VALID_DOCUMENT;
pub use stopwords::{StopwordProvider, StopwordSet};
