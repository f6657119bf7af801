//! Pipeline stages for document analysis.
//!
//! Each submodule implements exactly one transformation step. The three
//! external collaborators (rasterizer, OCR engine, summarizer) sit behind
//! traits so the pure stages in between can be tested with fakes.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ render ──▶ ocr ──┬─▶ segment ───┬─▶ validate ──┐
//! (walk root)  (pdfium)  (tess) ├─▶ lexical ───┘               ├─▶ record ──▶ persist
//!                               └─▶ classify ──▶ llm ──────────┘
//! ```
//!
//! 1. [`discover`] — walk the root, filter by extension, keep traversal order
//! 2. [`render`]   — first page of a PDF → transient PNG (skipped for images)
//! 3. [`ocr`]      — image → transcription
//! 4. [`segment`]  — blank-line paragraphs
//! 5. [`lexical`]  — alphabetic tokens minus stopwords, top-10 counts
//! 6. [`classify`] — section-keyword substring heuristic
//! 7. [`validate`] — paragraph and word thresholds
//! 8. [`llm`]      — summary for scientific documents, sentinel otherwise
//! 9. [`persist`]  — per-document and batch JSON artifacts

pub mod classify;
pub mod discover;
pub mod lexical;
pub mod llm;
pub mod ocr;
pub mod persist;
pub mod render;
pub mod segment;
pub mod validate;
