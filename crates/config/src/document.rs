//! Configuration document format
//!
//! A document has an optional `config` section, an optional top-level
//! `includes` list, and one section per hook:
//!
//! ```json
//! {
//!   "config": { "verbosity": "verbose", "includes": ["shared/hooks.json"] },
//!   "pre-commit": {
//!     "enabled": true,
//!     "actions": [
//!       {
//!         "action": "cargo fmt --check",
//!         "options": {},
//!         "conditions": [{ "exec": "file-staged.of-type", "args": { "type": "rs" } }],
//!         "config": { "label": "Formatting", "allow-failure": false }
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Files ending in `.toml` are parsed as TOML with the same structure.

use crate::condition::Condition;
use crate::settings::{self, Options, Settings};
use crate::{Error, Result};
use bosun_core::Hook;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// A parsed configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The `config` section: base settings, run, plugins, custom, includes
    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub config: Settings,

    /// Top-level include list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    /// Every other top-level key, expected to be a hook name
    #[serde(flatten)]
    pub sections: IndexMap<String, Value>,
}

/// Document shape of a hook section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookSpec {
    /// Explicit enabled flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Actions in execution order
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// Document shape of an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Command template or `::`-prefixed built-in identifier
    pub action: String,

    /// Action options
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Options::is_empty"
    )]
    pub options: Options,

    /// Conditions that must all hold for the action to run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Per-action settings
    #[serde(default, skip_serializing_if = "ActionSettings::is_empty")]
    pub config: ActionSettings,
}

/// The `config` section of an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSettings {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Failure tolerance
    #[serde(
        default,
        rename = "allow-failure",
        alias = "failureAllowed",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_failure: Option<bool>,
}

impl ActionSettings {
    /// Whether nothing is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.allow_failure.is_none()
    }
}

/// Accept an options map, or an empty list as written by some generators
pub(crate) fn deserialize_options<'de, D>(deserializer: D) -> std::result::Result<Options, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Options::new()),
        Value::Array(items) if items.is_empty() => Ok(Options::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(serde::de::Error::custom(format!(
            "options must be a map, got {other}"
        ))),
    }
}

/// Document syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON document
    Json,
    /// TOML document
    Toml,
}

impl Format {
    /// Pick the syntax from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl Document {
    /// Parse document text, choosing the syntax from the path's extension
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let parse_error = |message: String| Error::DocumentParse {
            path: path.to_path_buf(),
            message,
        };
        match Format::from_path(path) {
            Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            Format::Json if content.trim().is_empty() => Ok(Self::default()),
            Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Include entries in declaration order: `config.includes` first, then
    /// the top-level list
    pub fn include_list(&self, path: &Path) -> Result<Vec<String>> {
        let mut includes = match self.config.get(settings::INCLUDES) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<String>>(value.clone()).map_err(|e| {
                Error::InvalidDocument {
                    path: path.to_path_buf(),
                    message: format!("'config.includes' must be a list of paths: {e}"),
                }
            })?,
        };
        includes.extend(self.includes.iter().cloned());
        Ok(includes)
    }

    /// Hook sections keyed by hook
    ///
    /// Fails with `InvalidHookName` on any top-level key that is not a hook.
    pub fn hook_specs(&self, path: &Path) -> Result<Vec<(Hook, HookSpec)>> {
        self.sections
            .iter()
            .map(|(name, value)| {
                let hook = name.parse::<Hook>()?;
                let spec = match value {
                    Value::Null => HookSpec::default(),
                    value => serde_json::from_value::<HookSpec>(value.clone()).map_err(|e| {
                        Error::InvalidDocument {
                            path: path.to_path_buf(),
                            message: format!("hook '{name}': {e}"),
                        }
                    })?,
                };
                Ok((hook, spec))
            })
            .collect()
    }

    /// Serialize as pretty printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Message(e.to_string()))
    }

    /// Serialize as TOML
    ///
    /// Fails on values TOML cannot express, such as `null`.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Message(e.to_string()))
    }

    /// Serialize in the given syntax
    pub fn to_string_as(&self, format: Format) -> Result<String> {
        match format {
            Format::Json => self.to_json_string(),
            Format::Toml => self.to_toml_string(),
        }
    }
}
