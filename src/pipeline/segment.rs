//! Paragraph segmentation on blank-line boundaries.

/// Split a transcription into trimmed, non-empty paragraphs.
///
/// The boundary is a literal `"\n\n"`; spans that are empty after trimming
/// are dropped, and document order is preserved.
pub fn segment_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
