//! Path helpers

use std::path::{Path, PathBuf};

/// Resolve a path written in a document
///
/// `~` and `~/...` expand to the home directory; other relative paths are
/// joined onto `base_dir`.
pub fn resolve_path(path: &str, base_dir: &Path) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = ::dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path == "~"
        && let Some(home) = ::dirs::home_dir()
    {
        return home;
    }

    let path = Path::new(path);
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Make a path absolute against the current directory
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Whether an include entry points at a remote location
pub(crate) fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    ["http://", "https://", "ftp://", "git@", "ssh://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
