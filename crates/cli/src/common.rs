//! Common types shared across CLI commands

use anyhow::{Context, Result};
use bosun_config::paths::absolute;
use bosun_config::{ConfigLoader, Configuration, Settings};
use bosun_core::{DetachedRepository, RepositoryInspector};
use bosun_engine::Git2Inspector;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Runtime context for CLI commands
///
/// Holds the loaded configuration and the repository it belongs to. Outside
/// a git repository the context falls back to [`DetachedRepository`] and
/// commands run in the configuration's directory.
pub struct RuntimeContext {
    /// Shared configuration
    pub config: Arc<Configuration>,
    repository: Box<dyn RepositoryInspector>,
    working_dir: PathBuf,
}

impl RuntimeContext {
    /// Load the configuration at `config_path` and open its repository
    ///
    /// `overrides` take precedence over every configuration layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load(config_path: &Path, overrides: Settings) -> Result<Self> {
        let config_path = absolute(config_path);
        let config = ConfigLoader::new()
            .with_overrides(overrides)
            .load(&config_path)
            .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

        let git_dir = config.git_directory();
        let (repository, working_dir): (Box<dyn RepositoryInspector>, PathBuf) =
            match Git2Inspector::open(&git_dir) {
                Ok(inspector) => {
                    let dir = inspector
                        .workdir()
                        .map_or_else(|| config.base_dir().to_path_buf(), Path::to_path_buf);
                    (Box::new(inspector), dir)
                }
                Err(e) => {
                    debug!(git_dir = %git_dir.display(), error = %e, "no repository, running detached");
                    (Box::new(DetachedRepository), config.base_dir().to_path_buf())
                }
            };

        Ok(Self::from_parts(Arc::new(config), repository, working_dir))
    }

    /// Create a context from already-built parts
    pub fn from_parts(
        config: Arc<Configuration>,
        repository: Box<dyn RepositoryInspector>,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            repository,
            working_dir,
        }
    }

    /// The repository being worked on
    #[inline]
    pub fn repository(&self) -> &dyn RepositoryInspector {
        self.repository.as_ref()
    }

    /// Directory actions run in
    #[inline]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}
