//! Summarization prompt and the sentinel summary.
//!
//! The instruction wording lives here so the summarizer adapter only deals
//! with transport, and tests can inspect the exact text sent to the service.

/// Summary substituted for documents not classified as scientific.
pub const NOT_A_VALID_DOCUMENT: &str = "Not a valid document.";

/// Cut `text` to at most `max_chars` characters.
///
/// Counts Unicode scalar values, so the result is always valid UTF-8; the cut
/// is not word-aligned.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the instruction sent to the generative service.
///
/// The transcription is truncated to `max_chars` before being appended.
pub fn summary_prompt(text: &str, summary_words: usize, max_chars: usize) -> String {
    format!(
        "Summarize the following scientific text in {summary_words} words. \
         Preserve structure and clarity:\n\n{}",
        truncate_chars(text, max_chars)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn truncation_may_cut_mid_word() {
        assert_eq!(truncate_chars("introduction", 5), "intro");
    }

    #[test]
    fn prompt_embeds_truncated_text() {
        let text = "q".repeat(12_500);
        let p = summary_prompt(&text, 300, 12_000);
        assert!(p.starts_with(
            "Summarize the following scientific text in 300 words. Preserve structure and clarity:\n\n"
        ));
        assert_eq!(p.matches('q').count(), 12_000);
    }
}
