//! Repository inspection backed by git2 (libgit2)

use bosun_core::{Error, Hook, RepositoryInspector, Result};
use git2::{Delta, DiffOptions, Repository};
use std::path::{Path, PathBuf};

/// Helper function to convert git2 errors to `bosun_core` errors
#[inline]
#[allow(clippy::needless_pass_by_value)]
fn git_err(e: git2::Error) -> Error {
    Error::Git(e.message().to_string())
}

/// [`RepositoryInspector`] for an on-disk repository
pub struct Git2Inspector {
    repo: Repository,
}

impl Git2Inspector {
    /// Open the repository owning `git_dir`
    ///
    /// `git_dir` may be the `.git` directory or any path inside the work tree.
    pub fn open(git_dir: &Path) -> Result<Self> {
        let repo = Repository::open(git_dir)
            .or_else(|_| Repository::discover(git_dir))
            .map_err(git_err)?;
        Ok(Self { repo })
    }

    /// Root of the work tree, `None` for bare repositories
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// The `.git` directory
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    fn collect_paths(diff: &git2::Diff<'_>) -> Vec<PathBuf> {
        diff.deltas()
            .filter(|delta| delta.status() != Delta::Deleted)
            .filter_map(|delta| delta.new_file().path().map(Path::to_path_buf))
            .collect()
    }
}

impl RepositoryInspector for Git2Inspector {
    fn hook_installed(&self, hook: Hook) -> bool {
        self.repo.path().join("hooks").join(hook.as_str()).is_file()
    }

    fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => head
                .shorthand()
                .map(str::to_owned)
                .ok_or_else(|| Error::Git("HEAD is not valid UTF-8".to_string())),
            // No commits yet: HEAD still names the branch
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD").map_err(git_err)?;
                Ok(head
                    .symbolic_target()
                    .map(|target| target.trim_start_matches("refs/heads/").to_string())
                    .unwrap_or_default())
            }
            Err(e) => Err(git_err(e)),
        }
    }

    fn staged_files(&self) -> Result<Vec<PathBuf>> {
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree().map_err(git_err)?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(git_err(e)),
        };
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)
            .map_err(git_err)?;
        Ok(Self::collect_paths(&diff))
    }

    fn changed_files(&self) -> Result<Vec<PathBuf>> {
        let mut options = DiffOptions::new();
        options.include_untracked(false);
        let diff = self
            .repo
            .diff_index_to_workdir(None, Some(&mut options))
            .map_err(git_err)?;
        Ok(Self::collect_paths(&diff))
    }
}
