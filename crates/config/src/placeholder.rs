//! Configuration values for command placeholders
//!
//! `{$CONFIG|value-of:NAME}` in an action expands to [`resolve_config_value`]
//! of `NAME`. Recognized names:
//!
//! | Name                     | Value                                   |
//! |--------------------------|-----------------------------------------|
//! | `bootstrap`              | the `bootstrap` setting                 |
//! | `git-directory`          | the resolved git directory              |
//! | `interpreter-path`       | the `interpreter-path` setting          |
//! | `php-path`               | same as `interpreter-path`              |
//! | `custom>>KEY`            | custom value `KEY`                      |
//! | `plugin>>PLUGIN.KEY`     | option `KEY` of the first plugin `PLUGIN` |
//!
//! Anything else resolves to the empty string.

use crate::config::Configuration;
use crate::settings::{self, Options, value_to_string};

/// Prefix selecting a custom value
pub const CUSTOM_PREFIX: &str = "custom>>";

/// Prefix selecting a plugin option
pub const PLUGIN_PREFIX: &str = "plugin>>";

type Accessor = fn(&Configuration) -> String;

fn bootstrap(config: &Configuration) -> String {
    config.bootstrap()
}

fn git_directory(config: &Configuration) -> String {
    config.git_directory().display().to_string()
}

fn interpreter_path(config: &Configuration) -> String {
    config.interpreter_path()
}

const DIRECT_VALUES: &[(&str, Accessor)] = &[
    (settings::BOOTSTRAP, bootstrap),
    (settings::GIT_DIR, git_directory),
    (settings::INTERPRETER_PATH, interpreter_path),
    (settings::PHP_PATH, interpreter_path),
];

/// Resolve a configuration value by name, `""` when unknown
#[must_use]
pub fn resolve_config_value(name: &str, config: &Configuration) -> String {
    if let Some(key) = name.strip_prefix(CUSTOM_PREFIX) {
        return config
            .custom_value(key)
            .map(value_to_string)
            .unwrap_or_default();
    }
    if let Some(reference) = name.strip_prefix(PLUGIN_PREFIX) {
        return plugin_value(reference, config);
    }

    DIRECT_VALUES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, accessor)| accessor(config))
        .unwrap_or_default()
}

/// Resolve the `value-of` option of a placeholder, `""` when it is missing
#[must_use]
pub fn resolve_placeholder(options: &Options, config: &Configuration) -> String {
    options
        .get("value-of")
        .map(|name| resolve_config_value(&value_to_string(name), config))
        .unwrap_or_default()
}

/// `PLUGIN.KEY`, split at the last `.` so plugin identifiers may contain dots
fn plugin_value(reference: &str, config: &Configuration) -> String {
    let Some((plugin_id, key)) = reference.rsplit_once('.') else {
        return String::new();
    };
    config
        .plugin(plugin_id)
        .and_then(|plugin| plugin.option(key))
        .map(value_to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::ConfigLoader;
    use serde_json::json;
    use std::path::Path;

    fn load(document: &serde_json::Value) -> Configuration {
        ConfigLoader::new()
            .load_str(
                Path::new("/repo/bosun.json"),
                &serde_json::to_string(document).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_direct_values() {
        let config = load(&json!({
            "config": {"bootstrap": "vendor/autoload.php", "git-directory": "../.git"}
        }));

        assert_eq!(
            resolve_config_value("bootstrap", &config),
            "vendor/autoload.php"
        );
        assert_eq!(resolve_config_value("git-directory", &config), "/repo/../.git");
        assert_eq!(resolve_config_value("php-path", &config), "");
        assert_eq!(resolve_config_value("verbosity", &config), "");
    }

    #[test]
    fn test_custom_values() {
        let config = load(&json!({"config": {"custom": {"foo": "bar", "count": 3}}}));

        assert_eq!(resolve_config_value("custom>>foo", &config), "bar");
        assert_eq!(resolve_config_value("custom>>count", &config), "3");
        assert_eq!(resolve_config_value("custom>>missing", &config), "");
    }

    #[test]
    fn test_plugin_values_use_first_matching_plugin() {
        let config = load(&json!({"config": {"plugins": [
            {"plugin": "acme.notify", "options": {"channel": "dev"}},
            {"plugin": "preserve", "options": {"file": "a.txt"}},
            {"plugin": "preserve", "options": {"file": "b.txt"}}
        ]}}));

        assert_eq!(
            resolve_config_value("plugin>>acme.notify.channel", &config),
            "dev"
        );
        assert_eq!(resolve_config_value("plugin>>preserve.file", &config), "a.txt");
        assert_eq!(resolve_config_value("plugin>>preserve.missing", &config), "");
        assert_eq!(resolve_config_value("plugin>>unknown.file", &config), "");
        assert_eq!(resolve_config_value("plugin>>nodot", &config), "");
    }

    #[test]
    fn test_resolve_placeholder_without_value_of() {
        let config = load(&json!({"config": {"bootstrap": "boot.php"}}));
        let mut options = Options::new();

        assert_eq!(resolve_placeholder(&options, &config), "");

        options.insert("value-of".into(), json!("bootstrap"));
        assert_eq!(resolve_placeholder(&options, &config), "boot.php");
    }
}
