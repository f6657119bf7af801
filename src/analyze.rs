//! Orchestration: one record per document, one batch per run.
//!
//! Documents are processed strictly one after another and every stage of a
//! document is awaited before the next starts. Blocking collaborators
//! (pdfium, tesseract) run on `spawn_blocking` but are awaited immediately,
//! so execution stays sequential. Nothing is retried.
//!
//! By default the first failing document aborts the batch and its error
//! propagates; artifacts already written for earlier documents stay on disk.
//! With [`AnalysisConfig::keep_going`] the failure is recorded instead and
//! the batch continues.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, DocumentFailure};
use crate::output::{BatchResult, BatchStats, ResultRecord};
use crate::pipeline::discover::{discover, DocumentKind, DocumentRef};
use crate::pipeline::llm::{summarize_if_scientific, LlmSummarizer, Summarizer};
use crate::pipeline::ocr::{TesseractExtractor, TextExtractor};
use crate::pipeline::render::{PdfiumRasterizer, RasterImage, Rasterizer};
use crate::pipeline::{classify, lexical, persist, segment, validate};
use crate::stopwords::StopwordProvider;
use edgequake_llm::ProviderFactory;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A configured analyzer with its collaborators resolved.
///
/// Construct once per run; the stopword corpus is loaded on first use and
/// shared by every document afterwards.
pub struct Analyzer {
    config: AnalysisConfig,
    rasterizer: Arc<dyn Rasterizer>,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    stopwords: StopwordProvider,
}

impl Analyzer {
    /// Resolve collaborators from `config`.
    ///
    /// # Errors
    /// [`AnalysisError::MissingCredential`] when no summarizer is injected and
    /// the API key variable is unset or empty. This is checked here, before
    /// any document is discovered.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let summarizer = resolve_summarizer(&config)?;

        let rasterizer: Arc<dyn Rasterizer> = match &config.rasterizer {
            Some(r) => Arc::clone(r),
            None => {
                let mut r = PdfiumRasterizer::new(config.dpi);
                if let Some(lib) = &config.pdfium_lib_path {
                    r = r.with_library(lib);
                }
                Arc::new(r)
            }
        };

        let extractor: Arc<dyn TextExtractor> = match &config.extractor {
            Some(x) => Arc::clone(x),
            None => Arc::new(TesseractExtractor::new(
                config.tesseract_cmd.clone(),
                config.ocr_language.clone(),
            )),
        };

        let mut stopwords = StopwordProvider::new(config.stopwords.clone());
        if let Some(dir) = &config.stopword_cache_dir {
            stopwords = stopwords.with_cache_dir(dir);
        }

        Ok(Self {
            config,
            rasterizer,
            extractor,
            summarizer,
            stopwords,
        })
    }

    /// Replace the stopword provider, e.g. with a preloaded set.
    pub fn with_stopwords(mut self, provider: StopwordProvider) -> Self {
        self.stopwords = provider;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Rasterize (when paginated) and transcribe one document.
    pub async fn extract_text(&self, doc: &DocumentRef) -> Result<String, AnalysisError> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let extractor = Arc::clone(&self.extractor);
        let path = doc.path.clone();
        let kind = doc.kind;

        tokio::task::spawn_blocking(move || {
            // The raster image must outlive the OCR call.
            let image = match kind {
                DocumentKind::Paginated => rasterizer.rasterize(&path)?,
                DocumentKind::Image => RasterImage::Borrowed(path),
            };
            extractor.extract(image.path())
        })
        .await
        .map_err(|e| AnalysisError::Internal(format!("Extraction task panicked: {}", e)))?
    }

    /// Build the record for an already-transcribed document.
    pub async fn analyze_text(
        &self,
        file: impl Into<String>,
        text: &str,
    ) -> Result<ResultRecord, AnalysisError> {
        let file = file.into();

        let paragraphs = segment::segment_paragraphs(text).len();
        let stopwords = self.stopwords.get().await?;
        let profile = lexical::analyze_words(text, &stopwords);
        let is_scientific = classify::is_scientific(text);
        let valid = validate::is_valid(paragraphs, profile.filtered_word_count);
        debug!(
            "{}: {} paragraphs, {} words, scientific={}, valid={}",
            file, paragraphs, profile.filtered_word_count, is_scientific, valid
        );

        let summary =
            summarize_if_scientific(self.summarizer.as_ref(), text, is_scientific, &self.config)
                .await?;

        Ok(ResultRecord {
            file,
            is_scientific_article: is_scientific,
            paragraphs,
            word_count: profile.filtered_word_count,
            valid,
            top_words: profile.top_words,
            summary,
            error: None,
        })
    }

    /// Run the full pipeline for one document.
    pub async fn analyze_document(&self, doc: &DocumentRef) -> Result<ResultRecord, AnalysisError> {
        let text = self.extract_text(doc).await?;
        self.analyze_text(doc.file.clone(), &text).await
    }

    /// Analyze every eligible document under `root` without writing artifacts.
    pub async fn analyze_batch(&self, root: &Path) -> Result<BatchResult, AnalysisError> {
        self.process(root, None).await
    }

    /// Analyze `root` and write one artifact per document plus the batch file
    /// into [`AnalysisConfig::output_dir`].
    ///
    /// A run that discovers nothing writes nothing.
    pub async fn run(&self, root: &Path) -> Result<BatchResult, AnalysisError> {
        let out = self.config.output_dir.clone();
        self.process(root, Some(&out)).await
    }

    async fn process(
        &self,
        root: &Path,
        output_dir: Option<&Path>,
    ) -> Result<BatchResult, AnalysisError> {
        let start = Instant::now();
        let docs = discover(root, &self.config)?;
        let total = docs.len();

        if total == 0 {
            warn!("No eligible documents found under {}", root.display());
            return Ok(BatchResult::default());
        }
        info!("Analyzing {} documents under {}", total, root.display());

        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_batch_start(total);
        }

        let mut records = Vec::with_capacity(total);
        for (i, doc) in docs.iter().enumerate() {
            let index = i + 1;
            info!("[{}/{}] {}", index, total, doc.file);
            if let Some(cb) = cb {
                cb.on_document_start(index, total, &doc.file);
            }

            let record = match self.analyze_document(doc).await {
                Ok(record) => {
                    if let Some(cb) = cb {
                        cb.on_document_complete(index, total, &record);
                    }
                    record
                }
                Err(e) => {
                    if let Some(cb) = cb {
                        cb.on_document_error(index, total, &doc.file, &e.to_string());
                    }
                    if !self.config.keep_going {
                        return Err(e);
                    }
                    let failure = DocumentFailure::new(doc.file.clone(), &e);
                    warn!("Recording failure and continuing: {}", failure);
                    ResultRecord::failed(failure.file, failure.error)
                }
            };

            if let Some(dir) = output_dir {
                persist::write_record(dir, &record).await?;
            }
            records.push(record);
        }

        if let Some(dir) = output_dir {
            let path = persist::write_batch(dir, &self.config.batch_file_name, &records).await?;
            info!("Wrote batch results to {}", path.display());
        }

        let stats = compute_stats(total, &records, start);
        if let Some(cb) = cb {
            cb.on_batch_complete(total, stats.processed);
        }
        info!(
            "Batch complete: {}/{} documents, {} scientific, {} valid, {}ms",
            stats.processed, total, stats.scientific, stats.valid, stats.duration_ms
        );

        Ok(BatchResult { records, stats })
    }
}

/// Analyze `root` with a fresh [`Analyzer`]; no artifacts are written.
pub async fn analyze_batch(
    root: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<BatchResult, AnalysisError> {
    Analyzer::new(config.clone())?.analyze_batch(root.as_ref()).await
}

/// Analyze `root` and write artifacts into `config.output_dir`.
pub async fn analyze_batch_to_dir(
    root: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<BatchResult, AnalysisError> {
    Analyzer::new(config.clone())?.run(root.as_ref()).await
}

/// Synchronous wrapper around [`analyze_batch_to_dir`].
///
/// Creates a single-threaded tokio runtime internally.
pub fn analyze_batch_sync(
    root: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<BatchResult, AnalysisError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AnalysisError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze_batch_to_dir(root, config))
}

/// Fail unless `var` is set to a non-empty value.
pub fn require_credential(var: &str) -> Result<(), AnalysisError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(AnalysisError::MissingCredential {
            var: var.to_string(),
        }),
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// An injected summarizer wins; otherwise the credential must be present and
/// the provider factory builds the named provider.
fn resolve_summarizer(config: &AnalysisConfig) -> Result<Arc<dyn Summarizer>, AnalysisError> {
    if let Some(ref s) = config.summarizer {
        return Ok(Arc::clone(s));
    }

    require_credential(&config.api_key_env)?;

    let provider = ProviderFactory::create_llm_provider(&config.provider_name, &config.model)
        .map_err(|e| AnalysisError::ProviderNotConfigured {
            provider: config.provider_name.clone(),
            hint: format!("{e}"),
        })?;

    Ok(Arc::new(LlmSummarizer::new(provider, config)))
}

fn compute_stats(discovered: usize, records: &[ResultRecord], start: Instant) -> BatchStats {
    let ok = || records.iter().filter(|r| !r.is_failure());
    BatchStats {
        discovered,
        processed: ok().count(),
        failed: records.iter().filter(|r| r.is_failure()).count(),
        scientific: ok().filter(|r| r.is_scientific_article).count(),
        valid: ok().filter(|r| r.valid).count(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}
