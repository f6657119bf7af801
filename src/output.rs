//! Output types: per-document result records and batch results.

use serde::{Deserialize, Serialize};

/// A `(word, count)` pair; serialises as a two-element array `["cat", 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopWord(pub String, pub usize);

impl TopWord {
    pub fn word(&self) -> &str {
        &self.0
    }
}

/// Lexical statistics for one transcription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalProfile {
    /// Alphabetic tokens left after stopword removal.
    pub filtered_word_count: usize,
    /// Up to ten most frequent filtered words, count descending, ties in
    /// first-appearance order.
    pub top_words: Vec<TopWord>,
}

/// The verdict for one document. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Path relative to the batch root.
    pub file: String,
    pub is_scientific_article: bool,
    /// Number of non-empty paragraphs.
    pub paragraphs: usize,
    /// Filtered word count.
    pub word_count: usize,
    pub valid: bool,
    pub top_words: Vec<TopWord>,
    /// Generated summary, or the sentinel for non-scientific documents.
    pub summary: String,
    /// Present only for documents that failed under `keep_going`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    /// A placeholder record for a document that failed under `keep_going`.
    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            is_scientific_article: false,
            paragraphs: 0,
            word_count: 0,
            valid: false,
            top_words: Vec::new(),
            summary: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Run-level counters. Logged, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
    pub scientific: usize,
    pub valid: usize,
    pub duration_ms: u64,
}

/// All records from one run, in discovery order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub records: Vec<ResultRecord>,
    pub stats: BatchStats,
}

impl BatchResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultRecord {
        ResultRecord {
            file: "papers/ünï.pdf".into(),
            is_scientific_article: true,
            paragraphs: 6,
            word_count: 2500,
            valid: true,
            top_words: vec![TopWord("cat".into(), 2)],
            summary: "canned".into(),
            error: None,
        }
    }

    #[test]
    fn top_word_serialises_as_pair() {
        let json = serde_json::to_string(&TopWord("cat".into(), 2)).unwrap();
        assert_eq!(json, r#"["cat",2]"#);
    }

    #[test]
    fn record_field_order_and_names() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"file":"papers/ünï.pdf","is_scientific_article":true,"paragraphs":6,"word_count":2500,"valid":true,"top_words":[["cat",2]],"summary":"canned"}"#
        );
    }

    #[test]
    fn failed_record_serialises_error() {
        let r = ResultRecord::failed("a.pdf", "boom");
        assert!(r.is_failure());
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.ends_with(r#""summary":"","error":"boom"}"#), "got: {json}");
    }
}
