//! Source file discovery and reading.

use anyhow::{Context, Result};
use codeorigin::models::Language;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Project-local ignore file, same syntax as `.gitignore`
pub(super) const IGNORE_FILENAME: &str = ".codeoriginignore";

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            Language::extensions().contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Collect C/C++ files under `path`.
///
/// A single file is returned as-is whatever its extension. Directories are
/// walked honoring `.gitignore` and `.codeoriginignore`; the result is
/// sorted so output order does not depend on the walk.
pub(super) fn collect_source_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut builder = WalkBuilder::new(path);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(IGNORE_FILENAME);

    let mut files: Vec<PathBuf> = builder
        .build()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file() && is_source_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Read a source file. Invalid UTF-8 is replaced rather than rejected;
/// legacy C sources often carry Latin-1 comments.
pub(super) fn read_source(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Path shown in reports: relative to `root` when possible.
pub(super) fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}
