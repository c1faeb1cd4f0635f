//! The resolved configuration
//!
//! A [`Configuration`] is produced by [`crate::ConfigLoader`] and is read-only
//! afterwards. It always holds one [`HookConfig`] per recognized hook.

use crate::document::Document;
use crate::hook::HookConfig;
use crate::paths::resolve_path;
use crate::plugin::PluginConfig;
use crate::run::RunConfig;
use crate::settings::{self, Settings, Verbosity, is_truthy, value_to_string};
use crate::{Error, Result};
use bosun_core::Hook;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default name of the configuration document
pub const DEFAULT_FILE_NAME: &str = "bosun.json";

/// Name of the sidecar settings file next to the configuration document
pub const SETTINGS_FILE_NAME: &str = "bosun.config.json";

/// Merged configuration of a repository
#[derive(Debug, Clone)]
pub struct Configuration {
    path: PathBuf,
    file_exists: bool,
    settings: Settings,
    custom: Settings,
    run: RunConfig,
    plugins: Vec<PluginConfig>,
    hooks: [HookConfig; Hook::COUNT],
}

impl Configuration {
    /// An empty configuration: default settings, every hook disabled
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_exists: false,
            settings: Settings::new(),
            custom: Settings::new(),
            run: RunConfig::default(),
            plugins: Vec::new(),
            hooks: Hook::ALL.map(HookConfig::new),
        }
    }

    /// Build a configuration from merged raw settings
    ///
    /// Splits out `run`, `plugins` and `custom`, normalizes legacy keys and
    /// validates the remaining base settings.
    pub(crate) fn from_settings(path: PathBuf, file_exists: bool, mut raw: Settings) -> Result<Self> {
        settings::normalize_aliases(&mut raw);
        raw.shift_remove(settings::INCLUDES);

        let run = RunConfig::extract(&mut raw)?;
        let plugins = match raw.shift_remove(settings::PLUGINS) {
            Some(value) => PluginConfig::parse_list(value)?,
            None => Vec::new(),
        };
        let custom = match raw.shift_remove(settings::CUSTOM) {
            None | Some(Value::Null) => Settings::new(),
            Some(Value::Object(map)) => map.into_iter().collect(),
            Some(Value::Array(items)) if items.is_empty() => Settings::new(),
            Some(other) => {
                return Err(Error::invalid_setting(
                    settings::CUSTOM,
                    format!("expected a map of values, got {other}"),
                ));
            }
        };

        let config = Self {
            path,
            file_exists,
            settings: raw,
            custom,
            run,
            plugins,
            ..Self::new(PathBuf::new())
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(value) = self.settings.get(settings::VERBOSITY) {
            value_to_string(value)
                .parse::<Verbosity>()
                .map_err(|message| Error::invalid_setting(settings::VERBOSITY, message))?;
        }
        parse_includes_level(&self.settings)?;
        self.validate_interpreter()
    }

    fn validate_interpreter(&self) -> Result<()> {
        let value = self.interpreter_path();
        if value.trim().is_empty() {
            return Ok(());
        }
        let words = shell_words::split(&value)
            .map_err(|e| Error::invalid_setting(settings::INTERPRETER_PATH, e.to_string()))?;
        let Some(program) = words.first() else {
            return Ok(());
        };

        if resolve_path(program, self.base_dir()).is_file() || which::which(program).is_ok() {
            Ok(())
        } else {
            Err(Error::invalid_setting(
                settings::INTERPRETER_PATH,
                format!("'{program}' is neither a file nor an executable on PATH"),
            ))
        }
    }

    pub(crate) fn hook_mut(&mut self, hook: Hook) -> &mut HookConfig {
        &mut self.hooks[hook as usize]
    }

    /// Location of the configuration document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the configuration document
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Whether the configuration was read from an existing document
    #[must_use]
    pub fn is_loaded_from_file(&self) -> bool {
        self.file_exists
    }

    /// Base settings as written, legacy keys normalized
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Raw value of a base setting
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.settings.get(key).map_or(default, is_truthy)
    }

    fn text(&self, key: &str) -> String {
        self.settings.get(key).map(value_to_string).unwrap_or_default()
    }

    /// Whether every action may fail without failing the hook
    #[must_use]
    pub fn allow_failure(&self) -> bool {
        self.flag(settings::ALLOW_FAILURE, false)
    }

    /// Whether a failing action stops the remaining ones
    #[must_use]
    pub fn fail_on_first_error(&self) -> bool {
        self.flag(settings::FAIL_ON_FIRST_ERROR, true)
    }

    /// Whether output is colored
    #[must_use]
    pub fn ansi_colors(&self) -> bool {
        self.flag(settings::COLORS, true)
    }

    /// Output verbosity
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        self.settings
            .get(settings::VERBOSITY)
            .and_then(|value| value_to_string(value).parse().ok())
            .unwrap_or_default()
    }

    /// Bootstrap file handed to in-process actions
    #[must_use]
    pub fn bootstrap(&self) -> String {
        self.text(settings::BOOTSTRAP)
    }

    /// Interpreter used for in-process actions
    #[must_use]
    pub fn interpreter_path(&self) -> String {
        self.text(settings::INTERPRETER_PATH)
    }

    /// Maximum include nesting depth
    #[must_use]
    pub fn includes_level(&self) -> usize {
        parse_includes_level(&self.settings).unwrap_or(settings::DEFAULT_INCLUDES_LEVEL)
    }

    /// The repository's git directory
    ///
    /// Relative settings resolve against the configuration document's
    /// directory; without a setting it is `.git` in the working directory.
    #[must_use]
    pub fn git_directory(&self) -> PathBuf {
        let value = self.text(settings::GIT_DIR);
        if value.is_empty() {
            return std::env::current_dir()
                .unwrap_or_default()
                .join(".git");
        }
        resolve_path(&value, self.base_dir())
    }

    /// User defined values
    #[must_use]
    pub fn custom(&self) -> &Settings {
        &self.custom
    }

    /// Look up a user defined value
    #[must_use]
    pub fn custom_value(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }

    /// Run configuration
    #[must_use]
    pub fn run(&self) -> &RunConfig {
        &self.run
    }

    /// Configured plugins in priority order
    #[must_use]
    pub fn plugins(&self) -> &[PluginConfig] {
        &self.plugins
    }

    /// First plugin with the given identifier
    #[must_use]
    pub fn plugin(&self, id: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|plugin| plugin.plugin == id)
    }

    /// Stored configuration of every hook, in document order
    pub fn hooks(&self) -> impl Iterator<Item = &HookConfig> {
        self.hooks.iter()
    }

    /// Stored configuration of a hook
    #[must_use]
    pub fn hook(&self, hook: Hook) -> &HookConfig {
        &self.hooks[hook as usize]
    }

    /// Stored configuration of a hook by name
    pub fn hook_config(&self, name: &str) -> Result<&HookConfig> {
        Ok(self.hook(name.parse()?))
    }

    /// Whether a hook is enabled
    ///
    /// With `with_virtual`, a real hook also counts as enabled when the
    /// virtual hook it triggers is enabled.
    pub fn is_hook_enabled(&self, name: &str, with_virtual: bool) -> Result<bool> {
        let hook: Hook = name.parse()?;
        Ok(self.hook_enabled(hook, with_virtual))
    }

    fn hook_enabled(&self, hook: Hook, with_virtual: bool) -> bool {
        self.hook(hook).is_enabled()
            || (with_virtual
                && hook
                    .virtual_hook()
                    .is_some_and(|virt| self.hook(virt).is_enabled()))
    }

    /// Assemble the actions to run for a trigger
    ///
    /// The hook's own actions come first, followed by the actions of its
    /// virtual hook when that one is enabled. The result is a fresh view and
    /// never modifies the stored configuration.
    pub fn executable_hook_config(&self, name: &str) -> Result<HookConfig> {
        let hook: Hook = name.parse()?;
        let mut actions = self.hook(hook).actions().to_vec();

        if let Some(virt) = hook.virtual_hook() {
            let virtual_config = self.hook(virt);
            if virtual_config.is_enabled() {
                actions.extend(virtual_config.actions().iter().cloned());
            }
        }

        Ok(HookConfig::execution_view(
            hook,
            self.hook_enabled(hook, true),
            actions,
        ))
    }

    /// Hooks that are enabled directly or through their virtual hook
    pub fn enabled_hooks(&self) -> impl Iterator<Item = Hook> + '_ {
        Hook::ALL
            .into_iter()
            .filter(|hook| self.hook_enabled(*hook, true))
    }

    /// Export as a document
    ///
    /// Only hooks that are enabled or have actions are written, so loading
    /// the exported document yields the same enabled flags and actions.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut config = self.settings.clone();
        if !self.run.is_default()
            && let Ok(run) = serde_json::to_value(&self.run)
        {
            config.insert(settings::RUN.into(), run);
        }
        if !self.plugins.is_empty()
            && let Ok(plugins) = serde_json::to_value(&self.plugins)
        {
            config.insert(settings::PLUGINS.into(), plugins);
        }
        if !self.custom.is_empty() {
            config.insert(
                settings::CUSTOM.into(),
                Value::Object(self.custom.clone().into_iter().collect()),
            );
        }

        let sections = self
            .hooks
            .iter()
            .filter(|hook| hook.is_enabled() || hook.has_actions())
            .filter_map(|hook| {
                serde_json::to_value(hook.to_spec())
                    .ok()
                    .map(|spec| (hook.name().to_string(), spec))
            })
            .collect();

        Document {
            config,
            includes: Vec::new(),
            sections,
        }
    }
}

/// Read `includes-level` from raw settings
pub(crate) fn parse_includes_level(settings: &Settings) -> Result<usize> {
    let invalid = |value: &Value| {
        Error::invalid_setting(
            settings::INCLUDES_LEVEL,
            format!("expected a non-negative integer, got {value}"),
        )
    };
    match settings.get(settings::INCLUDES_LEVEL) {
        None | Some(Value::Null) => Ok(settings::DEFAULT_INCLUDES_LEVEL),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid(&Value::Number(n.clone()))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid(&Value::String(s.clone()))),
        Some(other) => Err(invalid(other)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::action::Action;
    use serde_json::json;

    fn config_with(settings: Value) -> Result<Configuration> {
        Configuration::from_settings(
            PathBuf::from("/repo/bosun.json"),
            true,
            serde_json::from_value(settings).unwrap(),
        )
    }

    #[test]
    fn test_fresh_configuration_has_every_hook_disabled() {
        let config = Configuration::new("/repo/bosun.json");

        assert!(!config.is_loaded_from_file());
        assert_eq!(config.hooks().count(), Hook::ALL.len());
        for hook in Hook::ALL {
            let hook_config = config.hook_config(hook.as_str()).unwrap();
            assert_eq!(hook_config.hook(), hook);
            assert!(!hook_config.is_enabled());
            assert!(!hook_config.has_actions());
        }
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::new("/repo/bosun.json");

        assert!(config.fail_on_first_error());
        assert!(config.ansi_colors());
        assert!(!config.allow_failure());
        assert_eq!(config.verbosity(), Verbosity::Normal);
        assert_eq!(config.includes_level(), 1);
        assert_eq!(config.bootstrap(), "");
        assert!(config.run().is_default());
        assert!(config.plugins().is_empty());
    }

    #[test]
    fn test_invalid_hook_name_on_every_path() {
        let config = Configuration::new("/repo/bosun.json");

        assert!(matches!(
            config.hook_config("foo"),
            Err(Error::InvalidHookName { .. })
        ));
        assert!(matches!(
            config.is_hook_enabled("foo", true),
            Err(Error::InvalidHookName { .. })
        ));
        assert!(matches!(
            config.executable_hook_config("foo"),
            Err(Error::InvalidHookName { .. })
        ));
    }

    #[test]
    fn test_is_hook_enabled_through_virtual_hook() {
        let mut config = Configuration::new("/repo/bosun.json");
        config.hook_mut(Hook::PostChange).set_enabled(true);

        assert!(!config.is_hook_enabled("post-checkout", false).unwrap());
        assert!(config.is_hook_enabled("post-checkout", true).unwrap());
        assert!(config.is_hook_enabled("post-merge", true).unwrap());
        assert!(!config.is_hook_enabled("pre-commit", true).unwrap());

        let enabled: Vec<_> = config.enabled_hooks().collect();
        assert_eq!(
            enabled,
            vec![
                Hook::PostMerge,
                Hook::PostCheckout,
                Hook::PostRewrite,
                Hook::PostChange
            ]
        );
    }

    #[test]
    fn test_executable_hook_config_appends_enabled_virtual_actions() {
        let mut config = Configuration::new("/repo/bosun.json");
        config.hook_mut(Hook::PostCheckout).set_enabled(true);
        config.hook_mut(Hook::PostCheckout).add_action(Action::new("foo"));
        config.hook_mut(Hook::PostChange).add_action(Action::new("bar"));

        let view = config.executable_hook_config("post-checkout").unwrap();
        assert_eq!(view.actions().len(), 1);
        assert!(view.is_execution_view());

        config.hook_mut(Hook::PostChange).set_enabled(true);
        let view = config.executable_hook_config("post-checkout").unwrap();
        let names: Vec<_> = view.actions().iter().map(Action::action).collect();
        assert_eq!(names, vec!["foo", "bar"]);

        assert_eq!(config.hook(Hook::PostCheckout).actions().len(), 1);
        assert!(!config.hook(Hook::PostCheckout).is_execution_view());
    }

    #[test]
    fn test_from_settings_splits_sections() {
        let config = config_with(json!({
            "verbosity": "verbose",
            "use-colors": false,
            "custom": {"foo": "bar"},
            "plugins": [{"plugin": "notify", "options": {"channel": "dev"}}],
            "run-mode": "docker",
            "run-exec": "docker exec app"
        }))
        .unwrap();

        assert_eq!(config.verbosity(), Verbosity::Verbose);
        assert!(!config.ansi_colors());
        assert_eq!(config.custom_value("foo"), Some(&json!("bar")));
        assert_eq!(config.plugin("notify").unwrap().option("channel"), Some(&json!("dev")));
        assert!(config.run().is_containerized());
        assert!(!config.settings().contains_key("custom"));
        assert!(!config.settings().contains_key("run-mode"));
    }

    #[test]
    fn test_invalid_verbosity() {
        let err = config_with(json!({"verbosity": "loud"})).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { ref key, .. } if key == "verbosity"));
    }

    #[test]
    fn test_invalid_includes_level() {
        assert!(config_with(json!({"includes-level": -1})).is_err());
        assert!(config_with(json!({"includes-level": "deep"})).is_err());
        assert_eq!(
            config_with(json!({"includes-level": "3"}))
                .unwrap()
                .includes_level(),
            3
        );
    }

    #[test]
    fn test_invalid_interpreter_path() {
        let err = config_with(json!({"php-path": "/definitely/not/here/php"})).unwrap_err();
        assert!(matches!(err, Error::InvalidSetting { ref key, .. } if key == "interpreter-path"));
    }

    #[test]
    fn test_interpreter_path_with_arguments_checks_program_only() {
        let interpreter = which::which("sh").unwrap();
        let value = format!("{} -e", interpreter.display());

        let config = config_with(json!({"interpreter-path": value})).unwrap();

        assert_eq!(config.interpreter_path(), value);
    }

    #[test]
    fn test_git_directory_relative_to_config() {
        let config = config_with(json!({"git-directory": "../.git"})).unwrap();
        assert_eq!(config.git_directory(), PathBuf::from("/repo/../.git"));

        let config = config_with(json!({})).unwrap();
        assert_eq!(
            config.git_directory(),
            std::env::current_dir().unwrap().join(".git")
        );
    }

    #[test]
    fn test_to_document_only_exports_used_hooks() {
        let mut config = config_with(json!({"custom": {"foo": "bar"}})).unwrap();
        config.hook_mut(Hook::PreCommit).set_enabled(true);
        config.hook_mut(Hook::PrePush).add_action(Action::new("cargo test"));

        let document = config.to_document();

        let hooks: Vec<_> = document.sections.keys().cloned().collect();
        assert_eq!(hooks, vec!["pre-push", "pre-commit"]);
        assert_eq!(document.config.get("custom"), Some(&json!({"foo": "bar"})));
    }
}
