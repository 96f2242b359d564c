//! Async file discovery.

use std::path::{Path, PathBuf};

use async_walkdir::WalkDir;
use futures::StreamExt;

use crate::{Error, Result};

/// Find every markdown file under `root`.
///
/// Returns paths sorted lexicographically so callers see a deterministic
/// discovery order. Unreadable entries are logged and skipped; a missing
/// root is an error.
pub async fn find_markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::not_found(
            root.to_string_lossy(),
            "content directory",
        ));
    }

    let mut files = Vec::new();
    let mut walker = WalkDir::new(root);

    while let Some(entry) = walker.next().await {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Walk error: {}", e);
                continue;
            }
        };

        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let is_markdown = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("md"))
            .unwrap_or(false);

        if is_markdown {
            files.push(path);
        }
    }

    files.sort();

    Ok(files)
}
