//! Configuration loading
//!
//! [`ConfigLoader`] reads the root document, resolves its includes depth
//! first and merges everything into a [`Configuration`].
//!
//! Merge rules:
//! - included documents are merged in declaration order, a document's own
//!   includes before the document itself, and their actions are marked as
//!   included
//! - in the root document a non-empty `actions` list replaces the included
//!   actions of that hook; included documents append
//! - an explicit `enabled` replaces the flag produced by the includes,
//!   otherwise a hook is enabled when any include enables it
//! - settings merge key by key, the including document wins; `custom` and
//!   `run` merge per entry, plugins per identifier
//!
//! The root document is level 0. Includes of a document at level `n` are only
//! processed while `n < includes-level`.

use crate::action::{Action, ActionOrigin};
use crate::config::{Configuration, SETTINGS_FILE_NAME, parse_includes_level};
use crate::document::Document;
use crate::paths::{self, resolve_path};
use crate::plugin::merge_plugin_lists;
use crate::run::normalize_run_keys;
use crate::settings::{self, KEYED_SECTIONS, Settings};
use crate::{Error, Result};
use bosun_core::Hook;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads configuration documents
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    overrides: Settings,
}

/// Merged settings and hooks of a document and everything it includes
#[derive(Debug, Default)]
struct Layer {
    settings: Settings,
    hooks: IndexMap<Hook, LayerHook>,
}

#[derive(Debug, Default)]
struct LayerHook {
    enabled: Option<bool>,
    actions: Vec<Action>,
}

impl Layer {
    /// Fold an included layer into this one
    fn absorb(&mut self, included: Layer) {
        merge_settings(&mut self.settings, included.settings);
        for (hook, incoming) in included.hooks {
            let entry = self.hooks.entry(hook).or_default();
            // None < Some(false) < Some(true): any include enabling the hook wins
            entry.enabled = entry.enabled.max(incoming.enabled);
            entry.actions.extend(incoming.actions);
        }
    }
}

impl ConfigLoader {
    /// Loader without overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a setting; overrides beat every document and the sidecar file
    #[must_use]
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Add several overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: Settings) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// Load the document at `path`
    ///
    /// A missing document yields an empty configuration that only carries the
    /// overrides.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<Configuration> {
        let path = paths::absolute(path);
        if !path.exists() {
            debug!("configuration document not found, using defaults");
            return Configuration::from_settings(path, false, self.overrides.clone());
        }

        let content = read_document(&path)?;
        self.load_str(&path, &content)
    }

    /// Load a root document from text
    ///
    /// `path` determines the syntax, the base directory for includes and the
    /// location of the sidecar settings file.
    pub fn load_str(&self, path: &Path, content: &str) -> Result<Configuration> {
        let path = paths::absolute(path);
        let document = Document::parse(&path, content)?;
        let max_level = if self.overrides.contains_key(settings::INCLUDES_LEVEL) {
            parse_includes_level(&self.overrides)?
        } else {
            parse_includes_level(&document.config)?
        };

        let root = self.resolve_document(&path, &document, 0, max_level)?;

        let mut merged = root.settings;
        if let Some(sidecar) = read_sidecar(&path)? {
            merge_settings(&mut merged, sidecar);
        }
        merge_settings(&mut merged, self.overrides.clone());

        let mut config = Configuration::from_settings(path, true, merged)?;
        for (hook, layer) in root.hooks {
            let hook_config = config.hook_mut(hook);
            hook_config.set_enabled(layer.enabled.unwrap_or(false));
            for action in layer.actions {
                hook_config.add_action(action);
            }
        }
        Ok(config)
    }

    fn resolve_document(
        &self,
        path: &Path,
        document: &Document,
        level: usize,
        max_level: usize,
    ) -> Result<Layer> {
        let origin = if level == 0 {
            ActionOrigin::Local
        } else {
            ActionOrigin::Included
        };
        let own_hooks = document.hook_specs(path)?;
        let declares_actions = own_hooks.iter().any(|(_, spec)| !spec.actions.is_empty());

        let includes = document.include_list(path)?;
        let included = if includes.is_empty() {
            Vec::new()
        } else if level >= max_level {
            debug!(
                document = %path.display(),
                level,
                skipped = includes.len(),
                "include depth reached, skipping nested includes"
            );
            Vec::new()
        } else {
            self.load_includes(path, &includes, level + 1, max_level, declares_actions)?
        };

        let mut layer = Layer::default();
        for included_layer in included {
            layer.absorb(included_layer);
        }

        let mut own_settings = document.config.clone();
        own_settings.shift_remove(settings::INCLUDES);
        if level > 0 {
            own_settings.shift_remove(settings::INCLUDES_LEVEL);
        }
        merge_settings(&mut layer.settings, own_settings);

        for (hook, spec) in own_hooks {
            let entry = layer.hooks.entry(hook).or_default();
            if let Some(enabled) = spec.enabled {
                entry.enabled = Some(enabled);
            }
            let replace = level == 0 && !spec.actions.is_empty();
            let actions = spec
                .actions
                .into_iter()
                .map(|action| Action::from_spec(action, origin));
            if replace {
                entry.actions = actions.collect();
            } else {
                entry.actions.extend(actions);
            }
        }

        Ok(layer)
    }

    fn load_includes(
        &self,
        including: &Path,
        includes: &[String],
        level: usize,
        max_level: usize,
        declares_actions: bool,
    ) -> Result<Vec<Layer>> {
        let base_dir = including.parent().unwrap_or_else(|| Path::new("."));
        let mut layers = Vec::with_capacity(includes.len());
        let mut failure = None;

        for location in includes {
            match self.load_include(location, including, base_dir, level, max_level) {
                Ok(layer) => layers.push(layer),
                Err(err) if !err.is_include_failure() => return Err(err),
                Err(err) => {
                    debug!(include = %location, error = %err, "include failed");
                    failure.get_or_insert(err);
                }
            }
        }

        match failure {
            None => Ok(layers),
            Some(err) if layers.is_empty() && !declares_actions => {
                warn!(
                    document = %including.display(),
                    error = %err,
                    "no include could be loaded, continuing without included configuration"
                );
                Ok(Vec::new())
            }
            Some(err) => Err(err),
        }
    }

    fn load_include(
        &self,
        location: &str,
        including: &Path,
        base_dir: &Path,
        level: usize,
        max_level: usize,
    ) -> Result<Layer> {
        if paths::is_remote(location) {
            return Err(Error::UnsupportedInclude {
                location: location.to_string(),
            });
        }

        let path = resolve_path(location, base_dir);
        if !path.is_file() {
            return Err(Error::IncludeNotFound {
                path,
                included_from: including.to_path_buf(),
            });
        }

        debug!(include = %path.display(), level, "loading include");
        let content = read_document(&path)?;
        let document = Document::parse(&path, &content)?;
        self.resolve_document(&path, &document, level, max_level)
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::DocumentRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings from the sidecar file next to the root document
fn read_sidecar(root: &Path) -> Result<Option<Settings>> {
    let Some(dir) = root.parent() else {
        return Ok(None);
    };
    let sidecar: PathBuf = dir.join(SETTINGS_FILE_NAME);
    if sidecar == root || !sidecar.is_file() {
        return Ok(None);
    }

    debug!(sidecar = %sidecar.display(), "applying settings file");
    let content = read_document(&sidecar)?;
    let mut settings = Document::parse(&sidecar, &content)?.config;
    settings.shift_remove(settings::INCLUDES);
    Ok(Some(settings))
}

/// Merge `overlay` into `base`, `overlay` winning
pub(crate) fn merge_settings(base: &mut Settings, overlay: Settings) {
    for (key, mut value) in overlay {
        if key == settings::RUN
            && let Value::Object(run) = &mut value
        {
            normalize_run_keys(run);
        }
        let keyed = KEYED_SECTIONS.contains(&key.as_str());
        let value = match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) if keyed => {
                existing.extend(incoming);
                continue;
            }
            (Some(Value::Array(existing)), Value::Array(incoming))
                if key == settings::PLUGINS =>
            {
                let lower = std::mem::take(existing);
                *existing = merge_plugin_lists(lower, incoming);
                continue;
            }
            (_, value) => value,
        };
        base.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &Value) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, serde_json::to_string_pretty(content).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_merge_settings_custom_by_key() {
        let mut base: Settings =
            serde_json::from_value(json!({"custom": {"a": 1, "b": 2}, "verbosity": "quiet"}))
                .unwrap();
        let overlay: Settings =
            serde_json::from_value(json!({"custom": {"b": 3, "c": 4}, "verbosity": "debug"}))
                .unwrap();

        merge_settings(&mut base, overlay);

        assert_eq!(base.get("custom"), Some(&json!({"a": 1, "b": 3, "c": 4})));
        assert_eq!(base.get("verbosity"), Some(&json!("debug")));
    }

    #[test]
    fn test_merge_settings_replaces_non_keyed_objects() {
        let mut base: Settings = serde_json::from_value(json!({"other": {"a": 1}})).unwrap();
        let overlay: Settings = serde_json::from_value(json!({"other": {"b": 2}})).unwrap();

        merge_settings(&mut base, overlay);

        assert_eq!(base.get("other"), Some(&json!({"b": 2})));
    }

    #[test]
    fn test_missing_document_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigLoader::new()
            .with_override("verbosity", "debug")
            .load(&temp.path().join("bosun.json"))
            .unwrap();

        assert!(!config.is_loaded_from_file());
        assert_eq!(config.verbosity(), crate::Verbosity::Debug);
        assert!(config.hooks().all(|hook| !hook.is_enabled()));
    }

    #[test]
    fn test_included_enabled_flag_is_inherited() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "shared.json",
            &json!({"pre-push": {"enabled": true, "actions": [{"action": "cargo test"}]}}),
        );
        let root = write(
            temp.path(),
            "bosun.json",
            &json!({"config": {"includes": ["shared.json"]}}),
        );

        let config = ConfigLoader::new().load(&root).unwrap();
        let hook = config.hook(Hook::PrePush);

        assert!(hook.is_enabled());
        assert!(!hook.has_local_actions());
        assert!(hook.actions()[0].is_included());
    }

    #[test]
    fn test_root_enabled_flag_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "shared.json", &json!({"pre-push": {"enabled": true}}));
        let root = write(
            temp.path(),
            "bosun.json",
            &json!({"includes": ["shared.json"], "pre-push": {"enabled": false}}),
        );

        let config = ConfigLoader::new().load(&root).unwrap();

        assert!(!config.hook(Hook::PrePush).is_enabled());
    }

    #[test]
    fn test_sidecar_and_overrides_precedence() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            SETTINGS_FILE_NAME,
            &json!({"config": {"verbosity": "verbose", "bootstrap": "sidecar.php"}}),
        );
        let root = write(
            temp.path(),
            "bosun.json",
            &json!({"config": {"verbosity": "quiet", "bootstrap": "root.php", "allow-failure": true}}),
        );

        let config = ConfigLoader::new()
            .with_override("bootstrap", "cli.php")
            .load(&root)
            .unwrap();

        assert_eq!(config.verbosity(), crate::Verbosity::Verbose);
        assert_eq!(config.bootstrap(), "cli.php");
        assert!(config.allow_failure());
    }

    #[test]
    fn test_remote_include_is_unsupported() {
        let temp = TempDir::new().unwrap();
        let root = write(
            temp.path(),
            "bosun.json",
            &json!({
                "config": {"includes": ["https://example.com/hooks.json"]},
                "pre-commit": {"enabled": true, "actions": [{"action": "make"}]}
            }),
        );

        let err = ConfigLoader::new().load(&root).unwrap_err();

        assert!(matches!(err, Error::UnsupportedInclude { .. }));
    }
}
