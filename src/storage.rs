// src/storage.rs
//! Writes render results to disk under generated, collision-resistant names.

use crate::error::PipelineError;
use crate::pipeline::RenderResult;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// `<slug-of-title>-<YYYYmmddTHHMMSS>-<nanos>.<ext>`.
pub fn generated_name(title: &str, result: &RenderResult) -> String {
    let now = Utc::now();
    let slug = slug::slugify(title);
    let stem = if slug.is_empty() { "quote".to_string() } else { slug };
    format!(
        "{}-{}-{:09}.{}",
        stem,
        now.format("%Y%m%dT%H%M%S"),
        now.timestamp_subsec_nanos(),
        result.content_kind.extension()
    )
}

/// Saves `result` into `dir`, creating the directory if needed, and returns the path.
pub fn save_result(dir: &Path, result: &RenderResult, title: &str) -> Result<PathBuf, PipelineError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(generated_name(title, result));
    fs::write(&path, &result.bytes)?;
    log::info!("[STORAGE] Wrote {} bytes to {}", result.bytes.len(), path.display());
    Ok(path)
}
