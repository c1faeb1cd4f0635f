//! Plugin configuration

use crate::document::deserialize_options;
use crate::settings::{self, Options};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A configured plugin: identifier plus options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin identifier
    pub plugin: String,

    /// Plugin options
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Options::is_empty"
    )]
    pub options: Options,
}

impl PluginConfig {
    /// Create a plugin entry without options
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            options: Options::new(),
        }
    }

    /// Add an option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Look up an option value
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Parse the raw `plugins` setting
    pub fn parse_list(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Null => Ok(Vec::new()),
            value => serde_json::from_value(value)
                .map_err(|e| Error::invalid_setting(settings::PLUGINS, e.to_string())),
        }
    }
}

/// Merge two raw plugin lists
///
/// Entries of `higher` come first; entries of `lower` whose identifier is
/// already declared in `higher` are dropped.
pub(crate) fn merge_plugin_lists(lower: Vec<Value>, higher: Vec<Value>) -> Vec<Value> {
    let identifier = |value: &Value| {
        value
            .get("plugin")
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    let declared: Vec<String> = higher.iter().filter_map(identifier).collect();

    let mut merged = higher;
    merged.extend(
        lower
            .into_iter()
            .filter(|value| identifier(value).is_none_or(|id| !declared.contains(&id))),
    );
    merged
}
