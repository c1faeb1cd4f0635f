//! Per-trigger context shared by conditions, placeholders and executors

use bosun_config::Configuration;
use bosun_core::{Hook, RepositoryInspector};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Everything known about the hook being run
pub struct HookContext<'a> {
    hook: Hook,
    config: &'a Configuration,
    repository: &'a dyn RepositoryInspector,
    args: IndexMap<&'static str, String>,
    working_dir: PathBuf,
}

impl<'a> HookContext<'a> {
    /// Bind the positional arguments git passed to their names
    ///
    /// Arguments beyond the hook's known names are ignored.
    pub fn new(
        hook: Hook,
        config: &'a Configuration,
        repository: &'a dyn RepositoryInspector,
        positional: &[String],
    ) -> Self {
        let args = hook
            .arg_names()
            .iter()
            .copied()
            .zip(positional.iter().cloned())
            .collect();
        Self {
            hook,
            config,
            repository,
            args,
            working_dir: config.base_dir().to_path_buf(),
        }
    }

    /// Directory commands run in
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// The triggered hook
    #[must_use]
    pub fn hook(&self) -> Hook {
        self.hook
    }

    /// The loaded configuration
    #[must_use]
    pub fn config(&self) -> &'a Configuration {
        self.config
    }

    /// Repository collaborator
    #[must_use]
    pub fn repository(&self) -> &'a dyn RepositoryInspector {
        self.repository
    }

    /// Named hook argument
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    /// All named hook arguments
    #[must_use]
    pub fn args(&self) -> &IndexMap<&'static str, String> {
        &self.args
    }

    /// Directory commands run in
    #[must_use]
    pub fn working_dir(&self) -> &std::path::Path {
        &self.working_dir
    }
}
