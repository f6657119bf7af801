//! Artifact writing: one JSON file per document plus the combined batch.
//!
//! Files are written atomically (temp file + rename) so an aborted run never
//! leaves a half-written record behind. Existing artifacts are overwritten
//! without inspection.

use crate::error::AnalysisError;
use crate::output::ResultRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-_.]").unwrap());

/// Replace every character outside `[\w\-_.]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    RE_UNSAFE.replace_all(name, "_").into_owned()
}

/// Output path for a document: `<dir>/<sanitized base name>.json`.
pub fn record_path(output_dir: &Path, file: &str) -> PathBuf {
    let base = file.rsplit('/').next().unwrap_or(file);
    output_dir.join(format!("{}.json", sanitize_file_name(base)))
}

/// Pretty JSON with a trailing newline; non-ASCII is kept as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AnalysisError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write one document's record and return where it went.
pub async fn write_record(
    output_dir: &Path,
    record: &ResultRecord,
) -> Result<PathBuf, AnalysisError> {
    let path = record_path(output_dir, &record.file);
    write_atomic(&path, &to_pretty_json(record)?).await?;
    Ok(path)
}

/// Write the combined artifact: a JSON array in discovery order.
pub async fn write_batch(
    output_dir: &Path,
    file_name: &str,
    records: &[ResultRecord],
) -> Result<PathBuf, AnalysisError> {
    let path = output_dir.join(file_name);
    write_atomic(&path, &to_pretty_json(records)?).await?;
    Ok(path)
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), AnalysisError> {
    let write_err = |source: std::io::Error| AnalysisError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
