//! Structural validity policy.

/// Paragraph count must exceed this.
pub const MIN_PARAGRAPHS: usize = 4;

/// Filtered word count must exceed this.
pub const MIN_WORDS: usize = 2000;

/// Valid iff `paragraphs > 4` and `word_count > 2000`; both bounds exclusive.
pub fn is_valid(paragraphs: usize, word_count: usize) -> bool {
    paragraphs > MIN_PARAGRAPHS && word_count > MIN_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exclusive() {
        assert!(is_valid(5, 2001));
        assert!(!is_valid(4, 2001));
        assert!(!is_valid(5, 2000));
        assert!(!is_valid(0, 0));
    }
}
