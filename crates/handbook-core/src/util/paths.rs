//! Generic path helpers: tilde expansion, binary location, marker search.

use std::path::{Path, PathBuf};

/// Expand a leading `~` (and `$VARS`) in a path string.
///
/// Falls back to the literal string if expansion fails.
pub fn expand_tilde(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log::debug!("Could not expand {path:?}: {e}");
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}

/// Directory containing the running binary, if it can be determined.
pub fn binary_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Walk up from `start` until a directory containing `marker` is found.
///
/// `marker` may be a nested relative path such as `content/primers`.
pub fn find_dir_with_marker(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_plain_path() {
        assert_eq!(expand_tilde("/srv/content"), PathBuf::from("/srv/content"));
    }

    #[test]
    fn test_expand_tilde_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/handbook"), home.join("handbook"));
        }
    }

    #[test]
    fn test_find_dir_with_marker() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(dir.path().join("content")).unwrap();

        let found = find_dir_with_marker(&nested, "content").unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn test_find_dir_with_marker_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_dir_with_marker(dir.path(), "definitely-not-here-xyz").is_none());
    }
}
