//! Run configuration
//!
//! Describes how actions are executed: directly on the host or inside a
//! container. Two document shapes are accepted and normalized to [`RunConfig`]:
//!
//! ```json
//! { "config": { "run": { "mode": "docker", "exec": "docker exec app" } } }
//! { "config": { "run-mode": "docker", "run-exec": "docker exec app" } }
//! ```

use crate::settings::{self, Settings};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where actions are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run on the host
    #[default]
    #[serde(alias = "native", alias = "shell")]
    Local,
    /// Run through a container command
    #[serde(alias = "container")]
    Docker,
}

impl RunMode {
    /// Setting value for this mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Docker => "docker",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alternative spellings of the nested `run` keys
const KEY_ALIASES: [(&str, &str); 4] = [
    ("docker-command", "exec"),
    ("path-tool", "path"),
    ("path-captain", "path"),
    ("path-git", "git"),
];

/// Rename alias keys of a nested `run` section to their field names
///
/// A value already present under the field name wins.
pub(crate) fn normalize_run_keys(run: &mut Map<String, Value>) {
    for (alias, field) in KEY_ALIASES {
        if let Some(value) = run.remove(alias) {
            run.entry(field).or_insert(value);
        }
    }
}

/// Normalized run configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Execution mode
    pub mode: RunMode,

    /// Container command prefix, e.g. `docker exec -i app`
    #[serde(alias = "docker-command", skip_serializing_if = "String::is_empty")]
    pub exec: String,

    /// Path to the bosun executable inside the execution environment
    #[serde(
        alias = "path-tool",
        alias = "path-captain",
        skip_serializing_if = "String::is_empty"
    )]
    pub path: String,

    /// Path to the git binary inside the execution environment
    #[serde(alias = "path-git", skip_serializing_if = "String::is_empty")]
    pub git: String,
}

impl RunConfig {
    /// Take the run configuration out of a settings map
    ///
    /// Removes the nested `run` section and the legacy flat keys from
    /// `settings`. Values from the nested section win; legacy keys only fill
    /// fields the nested section left empty.
    pub fn extract(settings: &mut Settings) -> Result<Self> {
        let nested = settings.shift_remove(settings::RUN);
        let nested_mode_set =
            matches!(&nested, Some(Value::Object(section)) if section.contains_key("mode"));
        let mut run = match nested {
            None | Some(Value::Null) => Self::default(),
            Some(value) => serde_json::from_value::<Self>(value)
                .map_err(|e| Error::invalid_setting(settings::RUN, e.to_string()))?,
        };

        if let Some(value) = settings.shift_remove(settings::RUN_MODE)
            && !nested_mode_set
        {
            run.mode = serde_json::from_value(value)
                .map_err(|e| Error::invalid_setting(settings::RUN_MODE, e.to_string()))?;
        }
        for (key, field) in [
            (settings::RUN_EXEC, &mut run.exec),
            (settings::RUN_PATH, &mut run.path),
            (settings::RUN_GIT, &mut run.git),
        ] {
            if let Some(value) = settings.shift_remove(key)
                && field.is_empty()
            {
                *field = settings::value_to_string(&value);
            }
        }

        Ok(run)
    }

    /// Whether every field holds its default
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Whether actions run inside a container
    #[must_use]
    pub fn is_containerized(&self) -> bool {
        self.mode == RunMode::Docker
    }
}
