//! Lexical analysis: tokenise, drop stopwords, count.
//!
//! Tokens are maximal runs of ASCII letters that sit on word boundaries, so
//! mixed tokens such as `abc123`, `foo_bar` or `café` are discarded entirely
//! rather than split. Counting keeps first-appearance order so that equal
//! counts rank by which word showed up first.

use crate::output::{LexicalProfile, TopWord};
use crate::stopwords::StopwordSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// How many entries [`analyze_words`] keeps in `top_words`.
pub const TOP_K: usize = 10;

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]+\b").unwrap());

/// Lower-case `text` and return its alphabetic word tokens in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    RE_WORD
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Filtered tokens: [`tokenize`] minus the stopwords.
pub fn filtered_words(text: &str, stopwords: &StopwordSet) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|w| !stopwords.contains(w))
        .collect()
}

/// Compute the filtered word count and the [`TOP_K`] most frequent words.
pub fn analyze_words(text: &str, stopwords: &StopwordSet) -> LexicalProfile {
    let words = filtered_words(text, stopwords);

    // Insertion-ordered counting: `order` keeps first appearance.
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<(&str, usize)> = Vec::new();
    for w in &words {
        match slots.get(w.as_str()) {
            Some(&i) => order[i].1 += 1,
            None => {
                slots.insert(w.as_str(), order.len());
                order.push((w.as_str(), 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    order.sort_by(|a, b| b.1.cmp(&a.1));

    LexicalProfile {
        filtered_word_count: words.len(),
        top_words: order
            .into_iter()
            .take(TOP_K)
            .map(|(w, c)| TopWord(w.to_string(), c))
            .collect(),
    }
}
