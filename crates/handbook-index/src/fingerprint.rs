//! Content fingerprinting.
//!
//! The fingerprint is a hash of every file's relative path and modification
//! time under the content root. It is cheap (no content is read) and changes
//! whenever a file is added, removed, renamed or touched, which is what a
//! refresh needs to report whether anything changed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::UNIX_EPOCH;

use async_walkdir::WalkDir;
use futures::StreamExt;
use handbook_core::{Error, Result};

/// Compute the fingerprint of a content directory.
pub async fn content_fingerprint(content_path: &Path) -> Result<String> {
    if !content_path.is_dir() {
        return Err(Error::not_found(
            content_path.to_string_lossy(),
            "content directory",
        ));
    }

    let mut file_info: Vec<(String, u128)> = Vec::new();
    let mut walker = WalkDir::new(content_path);

    while let Some(entry) = walker.next().await {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Walk error during fingerprinting: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let relative = path
            .strip_prefix(content_path)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        let mtime = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|meta| meta.modified().ok())
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        file_info.push((relative, mtime));
    }

    file_info.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = DefaultHasher::new();
    file_info.len().hash(&mut hasher);
    for (path, mtime) in &file_info {
        path.hash(&mut hasher);
        mtime.hash(&mut hasher);
    }

    Ok(format!("{:016x}", hasher.finish()))
}
