//! Stopword corpus: the set itself and a load-once provider.
//!
//! The lexical analyzer never reaches for global state. Callers build one
//! [`StopwordProvider`] per analyzer; its first [`StopwordProvider::get`]
//! loads the corpus (embedded list, file, or HTTP download) and every later
//! call hands back the same `Arc<StopwordSet>` without touching disk or
//! network again.

use crate::config::StopwordSource;
use crate::error::AnalysisError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// The English function-word corpus (179 entries).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// An immutable, lower-cased set of stopwords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// The built-in English corpus.
    pub fn english() -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().copied())
    }

    /// Parse a one-word-per-line corpus. Blank lines and `#` comments are skipped.
    pub fn parse(corpus: &str) -> Self {
        Self::new(
            corpus
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        if word.chars().any(char::is_uppercase) {
            self.words.contains(&word.to_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Loads a [`StopwordSet`] at most once and shares it read-only.
#[derive(Debug)]
pub struct StopwordProvider {
    source: StopwordSource,
    cache_dir: Option<PathBuf>,
    cell: OnceCell<Arc<StopwordSet>>,
}

impl StopwordProvider {
    pub fn new(source: StopwordSource) -> Self {
        Self {
            source,
            cache_dir: None,
            cell: OnceCell::new(),
        }
    }

    /// Persist downloaded corpora under `dir` so later processes skip the fetch.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// A provider that is already loaded with `set`.
    pub fn preloaded(set: StopwordSet) -> Self {
        Self {
            source: StopwordSource::Embedded,
            cache_dir: None,
            cell: OnceCell::new_with(Some(Arc::new(set))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the stopword set, loading it on first use.
    ///
    /// A failed load leaves the provider empty; the next call tries again.
    pub async fn get(&self) -> Result<Arc<StopwordSet>, AnalysisError> {
        self.cell
            .get_or_try_init(|| async {
                let set = self.load().await?;
                info!("Loaded {} stopwords from {}", set.len(), self.source);
                Ok::<_, AnalysisError>(Arc::new(set))
            })
            .await
            .map(Arc::clone)
    }

    async fn load(&self) -> Result<StopwordSet, AnalysisError> {
        match &self.source {
            StopwordSource::Embedded => Ok(StopwordSet::english()),
            StopwordSource::File(path) => read_corpus(path, &self.source).await,
            StopwordSource::Url(url) => {
                if let Some(cached) = self.cache_path(url) {
                    if cached.is_file() {
                        debug!("Stopword corpus cache hit: {}", cached.display());
                        return read_corpus(&cached, &self.source).await;
                    }
                }
                let body = download_corpus(url, &self.source).await?;
                if let Some(cached) = self.cache_path(url) {
                    write_cache(&cached, &body).await;
                }
                Ok(StopwordSet::parse(&body))
            }
        }
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let name: String = url
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
            .collect();
        Some(dir.join(format!("stopwords-{name}.txt")))
    }
}

async fn read_corpus(path: &Path, source: &StopwordSource) -> Result<StopwordSet, AnalysisError> {
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AnalysisError::StopwordLoad {
            source_desc: source.to_string(),
            detail: e.to_string(),
        })?;
    Ok(StopwordSet::parse(&body))
}

async fn download_corpus(url: &str, source: &StopwordSource) -> Result<String, AnalysisError> {
    info!("Downloading stopword corpus from: {}", url);
    let load_err = |detail: String| AnalysisError::StopwordLoad {
        source_desc: source.to_string(),
        detail,
    };

    let response = reqwest::get(url).await.map_err(|e| load_err(e.to_string()))?;
    if !response.status().is_success() {
        return Err(load_err(format!("HTTP {}", response.status())));
    }
    response.text().await.map_err(|e| load_err(e.to_string()))
}

/// Best effort: a failed cache write only costs a re-download next run.
async fn write_cache(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            debug!("Cannot create stopword cache dir {}: {}", parent.display(), e);
            return;
        }
    }
    if let Err(e) = tokio::fs::write(path, body).await {
        debug!("Cannot write stopword cache {}: {}", path.display(), e);
    }
}
