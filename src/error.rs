//! Error types for the scidoc-analyzer library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`AnalysisError`] — **Fatal**: the run (or the current document) cannot
//!   proceed. Missing credentials, unreadable documents, OCR failures and
//!   summarization-service failures all surface here and, by default, abort
//!   the batch.
//!
//! * [`DocumentFailure`] — **Recorded**: only produced when
//!   [`crate::config::AnalysisConfig::keep_going`] is enabled. The failing
//!   document gets a result record carrying the error message and the batch
//!   moves on to the next document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the scidoc-analyzer library.
#[derive(Debug, Error)]
pub enum AnalysisError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The summarization credential is absent from the environment.
    #[error("Environment variable {var} is not set.\nExport the API key for the summarization service before running.")]
    MissingCredential { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Discovery errors ──────────────────────────────────────────────────
    /// The batch root does not exist.
    #[error("Input root not found: '{path}'")]
    RootNotFound { path: PathBuf },

    /// A directory under the root could not be listed.
    #[error("Failed to scan '{path}': {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The paginated document cannot be parsed, or has no pages.
    #[error("Document '{path}' is unreadable: {detail}")]
    UnreadableDocument { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library next to the binary."
    )]
    PdfiumBindingFailed(String),

    /// The raster image cannot be opened or decoded.
    #[error("Cannot decode image '{path}': {detail}")]
    ImageDecodeError { path: PathBuf, detail: String },

    /// The OCR executable could not be started.
    #[error("OCR engine '{cmd}' is unavailable: {detail}\nInstall tesseract-ocr or pass --tesseract.")]
    OcrEngineUnavailable { cmd: String, detail: String },

    /// The OCR executable ran but reported failure.
    #[error("OCR failed for '{path}': {detail}")]
    OcrFailed { path: PathBuf, detail: String },

    // ── Lexical resources ─────────────────────────────────────────────────
    /// The stopword corpus could not be loaded.
    #[error("Failed to load stopwords from {source_desc}: {detail}")]
    StopwordLoad { source_desc: String, detail: String },

    // ── Summarization errors ──────────────────────────────────────────────
    /// The provider factory could not build the requested provider.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Any transport, auth or quota failure from the generative service.
    #[error("Summarization service error ({model}): {detail}")]
    SummarizationServiceError { model: String, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A result record could not be serialised.
    #[error("Failed to serialise results: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A per-document failure kept in the batch when `keep_going` is enabled.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
#[error("{file}: {error}")]
pub struct DocumentFailure {
    /// File identifier (relative path) of the failing document.
    pub file: String,
    /// Human-readable error message.
    pub error: String,
}

impl DocumentFailure {
    pub fn new(file: impl Into<String>, err: &AnalysisError) -> Self {
        Self {
            file: file.into(),
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_variable() {
        let e = AnalysisError::MissingCredential {
            var: "GEMINI_API_KEY".into(),
        };
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn summarization_error_display() {
        let e = AnalysisError::SummarizationServiceError {
            model: "gemini-1.5-flash".into(),
            detail: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini-1.5-flash"), "got: {msg}");
        assert!(msg.contains("quota exceeded"), "got: {msg}");
    }

    #[test]
    fn document_failure_carries_message() {
        let e = AnalysisError::UnreadableDocument {
            path: PathBuf::from("a.pdf"),
            detail: "document has no pages".into(),
        };
        let f = DocumentFailure::new("dir/a.pdf", &e);
        assert_eq!(f.file, "dir/a.pdf");
        assert!(f.error.contains("no pages"));
        assert!(f.to_string().starts_with("dir/a.pdf: "));
    }
}
