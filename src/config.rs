//! Configuration types for document analysis.
//!
//! Every knob lives in [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. External collaborators (rasterizer, OCR engine,
//! summarizer) are optional handles on the config; when unset, the analyzer
//! builds the default pdfium / tesseract / LLM adapters itself.

use crate::error::AnalysisError;
use crate::pipeline::llm::Summarizer;
use crate::pipeline::ocr::TextExtractor;
use crate::pipeline::render::Rasterizer;
use crate::progress::BatchProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default summarization model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default provider family passed to the provider factory.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Environment variable holding the summarization API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for an analysis run.
///
/// # Example
/// ```rust
/// use scidoc_analyzer::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .dpi(200)
///     .output_dir("outputs")
///     .extension("png")
///     .build()
///     .unwrap();
/// assert_eq!(config.extensions, vec!["pdf".to_string(), "png".to_string()]);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Rasterization DPI for the first page of paginated documents. Range: 72–600. Default: 200.
    pub dpi: u32,

    /// Characters of transcription sent to the summarizer. Default: 12 000.
    ///
    /// Hard cap counted in characters, not words; the cut may fall mid-word.
    pub max_input_chars: usize,

    /// Target summary length written into the instruction. Default: 300.
    ///
    /// Only requested from the service, never enforced locally.
    pub summary_words: usize,

    /// LLM model identifier. Default: `gemini-1.5-flash`.
    pub model: String,

    /// LLM provider name understood by `edgequake_llm::ProviderFactory`. Default: `gemini`.
    pub provider_name: String,

    /// Environment variable that must carry the API key. Default: `GEMINI_API_KEY`.
    pub api_key_env: String,

    /// Sampling temperature forwarded to the provider when set.
    pub temperature: Option<f32>,

    /// Output token limit forwarded to the provider when set.
    pub max_tokens: Option<usize>,

    /// Lower-case file extensions eligible for discovery. Default: `["pdf"]`.
    pub extensions: Vec<String>,

    /// Directory receiving per-document and batch artifacts. Default: `outputs`.
    pub output_dir: PathBuf,

    /// File name of the combined batch artifact. Default: `all_results.json`.
    pub batch_file_name: String,

    /// Tesseract language code. Default: `eng`.
    pub ocr_language: String,

    /// Tesseract executable. Default: `tesseract`.
    pub tesseract_cmd: String,

    /// Explicit pdfium shared library. Falls back to `./` then the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Where the stopword corpus comes from. Default: embedded English list.
    pub stopwords: StopwordSource,

    /// Directory caching a downloaded stopword corpus between processes.
    pub stopword_cache_dir: Option<PathBuf>,

    /// Record failing documents and continue instead of aborting the batch. Default: false.
    pub keep_going: bool,

    /// Injected rasterizer. Overrides the pdfium adapter.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Injected text extractor. Overrides the tesseract adapter.
    pub extractor: Option<Arc<dyn TextExtractor>>,

    /// Injected summarizer. Overrides the LLM adapter and skips the credential check.
    pub summarizer: Option<Arc<dyn Summarizer>>,

    /// Optional per-document progress events.
    pub progress_callback: Option<Arc<dyn BatchProgressCallback>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            max_input_chars: 12_000,
            summary_words: 300,
            model: DEFAULT_MODEL.to_string(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: None,
            max_tokens: None,
            extensions: vec!["pdf".to_string()],
            output_dir: PathBuf::from("outputs"),
            batch_file_name: "all_results.json".to_string(),
            ocr_language: "eng".to_string(),
            tesseract_cmd: "tesseract".to_string(),
            pdfium_lib_path: None,
            stopwords: StopwordSource::default(),
            stopword_cache_dir: None,
            keep_going: false,
            rasterizer: None,
            extractor: None,
            summarizer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("dpi", &self.dpi)
            .field("max_input_chars", &self.max_input_chars)
            .field("summary_words", &self.summary_words)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("api_key_env", &self.api_key_env)
            .field("extensions", &self.extensions)
            .field("output_dir", &self.output_dir)
            .field("ocr_language", &self.ocr_language)
            .field("stopwords", &self.stopwords)
            .field("keep_going", &self.keep_going)
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn TextExtractor>"))
            .field("summarizer", &self.summarizer.as_ref().map(|_| "<dyn Summarizer>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// True when `ext` (without the dot) is in the discovery filter.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

/// Builder for [`AnalysisConfig`].
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_input_chars(mut self, n: usize) -> Self {
        self.config.max_input_chars = n;
        self
    }

    pub fn summary_words(mut self, n: usize) -> Self {
        self.config.summary_words = n;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.config.api_key_env = var.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    /// Add one eligible extension (leading dot optional, case-insensitive).
    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        let ext = normalise_extension(ext.as_ref());
        if !ext.is_empty() && !self.config.extensions.contains(&ext) {
            self.config.extensions.push(ext);
        }
        self
    }

    /// Replace the whole extension filter.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.extensions.clear();
        for e in exts {
            self = self.extension(e);
        }
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn batch_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.batch_file_name = name.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn stopwords(mut self, source: StopwordSource) -> Self {
        self.config.stopwords = source;
        self
    }

    pub fn stopword_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.stopword_cache_dir = Some(dir.into());
        self
    }

    pub fn keep_going(mut self, v: bool) -> Self {
        self.config.keep_going = v;
        self
    }

    pub fn rasterizer(mut self, r: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(r);
        self
    }

    pub fn extractor(mut self, x: Arc<dyn TextExtractor>) -> Self {
        self.config.extractor = Some(x);
        self
    }

    pub fn summarizer(mut self, s: Arc<dyn Summarizer>) -> Self {
        self.config.summarizer = Some(s);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn BatchProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalysisError> {
        let c = &self.config;
        if c.max_input_chars == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_input_chars must be ≥ 1".into(),
            ));
        }
        if c.extensions.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one document extension is required".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig("model must not be empty".into()));
        }
        if c.batch_file_name.trim().is_empty() || c.batch_file_name.contains(['/', '\\']) {
            return Err(AnalysisError::InvalidConfig(format!(
                "batch file name must be a plain file name, got {:?}",
                c.batch_file_name
            )));
        }
        Ok(self.config)
    }
}

fn normalise_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Where the stopword corpus is loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopwordSource {
    /// The English corpus compiled into the crate. (default)
    #[default]
    Embedded,
    /// A one-word-per-line file on disk.
    File(PathBuf),
    /// A one-word-per-line corpus fetched over HTTP.
    Url(String),
}

impl fmt::Display for StopwordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopwordSource::Embedded => write!(f, "embedded English corpus"),
            StopwordSource::File(p) => write!(f, "file '{}'", p.display()),
            StopwordSource::Url(u) => write!(f, "URL '{}'", u),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = AnalysisConfig::default();
        assert_eq!(c.dpi, 200);
        assert_eq!(c.max_input_chars, 12_000);
        assert_eq!(c.summary_words, 300);
        assert_eq!(c.model, "gemini-1.5-flash");
        assert_eq!(c.api_key_env, "GEMINI_API_KEY");
        assert_eq!(c.extensions, vec!["pdf"]);
        assert!(!c.keep_going);
    }

    #[test]
    fn extensions_are_normalised_and_deduplicated() {
        let c = AnalysisConfig::builder()
            .extension(".PNG")
            .extension("png")
            .extension(" jpg ")
            .build()
            .unwrap();
        assert_eq!(c.extensions, vec!["pdf", "png", "jpg"]);
        assert!(c.accepts_extension("PDF"));
        assert!(c.accepts_extension("Jpg"));
        assert!(!c.accepts_extension("txt"));
    }

    #[test]
    fn empty_extension_filter_is_rejected() {
        let err = AnalysisConfig::builder()
            .extensions(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn batch_file_name_must_not_be_a_path() {
        let err = AnalysisConfig::builder()
            .batch_file_name("nested/all.json")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("plain file name"));
    }

    #[test]
    fn dpi_is_clamped() {
        assert_eq!(AnalysisConfig::builder().dpi(10).build().unwrap().dpi, 72);
        assert_eq!(AnalysisConfig::builder().dpi(5000).build().unwrap().dpi, 600);
    }

    #[test]
    fn debug_hides_collaborators() {
        let s = format!("{:?}", AnalysisConfig::default());
        assert!(s.contains("AnalysisConfig"));
        assert!(s.contains("summarizer: None"));
    }
}
