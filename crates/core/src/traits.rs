//! Core behavioral traits for bosun components
//!
//! Collaborators that live outside the configuration engine are reached
//! through these traits, so the engine can be exercised against in-memory
//! fakes in tests.

use crate::{Hook, Result};
use std::path::PathBuf;

/// Read-only view of the repository a hook runs in
///
/// # Examples
///
/// ```ignore
/// fn on_main(repo: &dyn RepositoryInspector) -> Result<bool> {
///     Ok(repo.current_branch()? == "main")
/// }
/// ```
pub trait RepositoryInspector {
    /// Whether a hook script for `hook` exists in the repository's hook directory
    fn hook_installed(&self, hook: Hook) -> bool;

    /// Name of the checked out branch
    fn current_branch(&self) -> Result<String>;

    /// Paths staged for the next commit, relative to the repository root
    fn staged_files(&self) -> Result<Vec<PathBuf>>;

    /// Paths modified in the working tree but not staged
    fn changed_files(&self) -> Result<Vec<PathBuf>>;
}

/// Inspector for running outside of any repository
///
/// Reports nothing installed, an empty branch name and no files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedRepository;

impl RepositoryInspector for DetachedRepository {
    fn hook_installed(&self, _hook: Hook) -> bool {
        false
    }

    fn current_branch(&self) -> Result<String> {
        Ok(String::new())
    }

    fn staged_files(&self) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn changed_files(&self) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}
