//! Setting keys and value helpers
//!
//! Base settings are kept as an ordered map of raw JSON values so that an
//! exported configuration reproduces the document it was loaded from. Typed
//! access goes through the accessors on [`crate::Configuration`].

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Ordered map of setting name to raw value
pub type Settings = IndexMap<String, Value>;

/// Ordered map of option name to raw value (action, plugin and condition options)
pub type Options = IndexMap<String, Value>;

/// Actions may fail without stopping the hook
pub const ALLOW_FAILURE: &str = "allow-failure";
/// Path to a bootstrap file handed to in-process actions
pub const BOOTSTRAP: &str = "bootstrap";
/// Colored output
pub const COLORS: &str = "ansi-colors";
/// Legacy spelling of [`COLORS`]
pub const COLORS_LEGACY: &str = "use-colors";
/// User defined values
pub const CUSTOM: &str = "custom";
/// Abort a hook on the first failing action
pub const FAIL_ON_FIRST_ERROR: &str = "fail-on-first-error";
/// Location of the repository's git directory
pub const GIT_DIR: &str = "git-directory";
/// Documents to merge into the current one
pub const INCLUDES: &str = "includes";
/// Maximum include nesting depth
pub const INCLUDES_LEVEL: &str = "includes-level";
/// Interpreter used for in-process actions
pub const INTERPRETER_PATH: &str = "interpreter-path";
/// Legacy spelling of [`INTERPRETER_PATH`]
pub const PHP_PATH: &str = "php-path";
/// Plugin list
pub const PLUGINS: &str = "plugins";
/// Nested run configuration
pub const RUN: &str = "run";
/// Legacy flat run mode
pub const RUN_MODE: &str = "run-mode";
/// Legacy flat container command
pub const RUN_EXEC: &str = "run-exec";
/// Legacy flat tool path
pub const RUN_PATH: &str = "run-path";
/// Legacy flat git path
pub const RUN_GIT: &str = "run-git";
/// Output verbosity
pub const VERBOSITY: &str = "verbosity";

/// Include depth used when `includes-level` is not set
pub const DEFAULT_INCLUDES_LEVEL: usize = 1;

/// Settings that are objects merged by key instead of replaced wholesale
pub(crate) const KEYED_SECTIONS: [&str; 2] = [CUSTOM, RUN];

/// Rename legacy keys to their current spelling
///
/// A value already present under the current key wins over the legacy one.
pub fn normalize_aliases(settings: &mut Settings) {
    for (legacy, current) in [(PHP_PATH, INTERPRETER_PATH), (COLORS_LEGACY, COLORS)] {
        if let Some(value) = settings.shift_remove(legacy) {
            settings.entry(current.to_string()).or_insert(value);
        }
    }
}

/// Render a raw value for command lines and reports
///
/// Strings are returned verbatim, `null` becomes the empty string and
/// composite values are rendered as compact JSON.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Loose truthiness used for flags and custom values
///
/// `"0"`, `"false"`, `"no"`, `"off"` and the empty string are false.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty()
                || s == "0"
                || s.eq_ignore_ascii_case("false")
                || s.eq_ignore_ascii_case("no")
                || s.eq_ignore_ascii_case("off"))
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Output verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Action names and results
    #[default]
    Normal,
    /// Action output included
    Verbose,
    /// Everything, including skipped actions and condition results
    Debug,
}

impl Verbosity {
    /// Setting value for this verbosity
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
            Self::Debug => "debug",
        }
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            other => Err(format!(
                "unknown verbosity '{other}', expected quiet, normal, verbose or debug"
            )),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
