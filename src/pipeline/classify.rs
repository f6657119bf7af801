//! Scientific-article heuristic.
//!
//! A raw substring match over canonical section headings. Words that merely
//! contain a keyword ("abstractly", "preferences") also match; this is the
//! accepted precision trade-off of the heuristic and must stay substring-based.

/// Section markers whose presence marks a document as scientific.
pub const SCIENTIFIC_KEYWORDS: [&str; 4] = ["abstract", "introduction", "keywords", "references"];

/// True when the lower-cased text contains any of [`SCIENTIFIC_KEYWORDS`].
pub fn is_scientific(text: &str) -> bool {
    let lower = text.to_lowercase();
    SCIENTIFIC_KEYWORDS.iter().any(|k| lower.contains(k))
}
