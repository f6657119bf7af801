//! Input discovery: walk a root and queue every eligible document.
//!
//! Entries are visited in the order the file system returns them; nothing is
//! sorted, so the batch order is traversal order. Extension matching is
//! case-insensitive against [`AnalysisConfig::extensions`]. Directory links
//! are not followed, so a link cycle cannot queue the same file twice.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a document reaches the text extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Paginated; the first page is rasterized before OCR.
    Paginated,
    /// Already an image; handed to OCR as-is.
    Image,
}

impl DocumentKind {
    pub fn of(path: &Path) -> Self {
        match extension_of(path) {
            Some(ext) if ext == "pdf" => DocumentKind::Paginated,
            _ => DocumentKind::Image,
        }
    }
}

/// One queued input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Absolute or caller-relative path used for I/O.
    pub path: PathBuf,
    /// `/`-separated path relative to the batch root.
    pub file: String,
    pub kind: DocumentKind,
}

impl DocumentRef {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let file = relative_id(root, &path);
        let kind = DocumentKind::of(&path);
        Self { path, file, kind }
    }
}

/// Discover eligible documents under `root`.
///
/// A root that is a file is a one-document batch when it passes the filter.
pub fn discover(root: &Path, config: &AnalysisConfig) -> Result<Vec<DocumentRef>, AnalysisError> {
    if !root.exists() {
        return Err(AnalysisError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    if root.is_file() {
        if is_eligible(root, config) || is_named_document(root) {
            let base = root.parent().unwrap_or_else(|| Path::new(""));
            found.push(DocumentRef::new(base, root.to_path_buf()));
        }
    } else {
        walk(root, root, config, &mut found)?;
    }

    debug!("Discovered {} documents under {}", found.len(), root.display());
    Ok(found)
}

fn walk(
    root: &Path,
    dir: &Path,
    config: &AnalysisConfig,
    found: &mut Vec<DocumentRef>,
) -> Result<(), AnalysisError> {
    let entries = std::fs::read_dir(dir).map_err(|e| AnalysisError::Discovery {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::Discovery {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| AnalysisError::Discovery {
            path: path.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            walk(root, &path, config, found)?;
        } else if file_type.is_symlink() && path.is_dir() {
            debug!("Not following directory link {}", path.display());
        } else if is_eligible(&path, config) {
            found.push(DocumentRef::new(root, path));
        }
    }
    Ok(())
}

fn is_eligible(path: &Path, config: &AnalysisConfig) -> bool {
    extension_of(path).is_some_and(|ext| config.accepts_extension(&ext))
}

/// An explicitly named file is accepted when it is a PDF or has an image
/// extension, even if the batch filter would skip it.
fn is_named_document(path: &Path) -> bool {
    DocumentKind::of(path) == DocumentKind::Paginated || ImageFormat::from_path(path).is_ok()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn relative_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn sorted_ids(docs: &[DocumentRef]) -> Vec<String> {
        let mut ids: Vec<String> = docs.iter().map(|d| d.file.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn walks_recursively_and_filters_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("nested/deeper/B.PDF"));
        touch(&dir.path().join("nested/notes.txt"));
        touch(&dir.path().join("scan.png"));

        let docs = discover(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(sorted_ids(&docs), vec!["a.pdf", "nested/deeper/B.PDF"]);
        assert!(docs.iter().all(|d| d.kind == DocumentKind::Paginated));
    }

    #[test]
    fn extra_extensions_are_images() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("scan.PNG"));
        let cfg = AnalysisConfig::builder().extension("png").build().unwrap();

        let docs = discover(dir.path(), &cfg).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].kind, DocumentKind::Image);
    }

    #[test]
    fn file_root_is_single_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paper.pdf");
        touch(&file);

        let docs = discover(&file, &AnalysisConfig::default()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file, "paper.pdf");
    }

    #[test]
    fn file_root_image_bypasses_the_filter() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("scan.png");
        let notes = dir.path().join("notes.txt");
        touch(&scan);
        touch(&notes);

        let docs = discover(&scan, &AnalysisConfig::default()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file, "scan.png");
        assert_eq!(docs[0].kind, DocumentKind::Image);

        assert!(discover(&notes, &AnalysisConfig::default()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn directory_links_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("sub/b.pdf"));
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("sub/up")).unwrap();

        let docs = discover(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(sorted_ids(&docs), vec!["a.pdf", "sub/b.pdf"]);
    }

    #[cfg(unix)]
    #[test]
    fn file_links_are_still_discovered() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("store/paper.pdf");
        touch(&target);
        std::os::unix::fs::symlink(&target, dir.path().join("linked.pdf")).unwrap();

        let docs = discover(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(sorted_ids(&docs), vec!["linked.pdf", "store/paper.pdf"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = discover(Path::new("/no/such/root"), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::RootNotFound { .. }));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), &AnalysisConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn files_without_extension_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("pdf"));
        assert!(discover(dir.path(), &AnalysisConfig::default()).unwrap().is_empty());
    }
}
