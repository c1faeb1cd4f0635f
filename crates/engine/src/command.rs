//! Command placeholder expansion
//!
//! Placeholders in action commands are expanded right before the command
//! runs:
//!
//! ```text
//! {$NAME}
//! {$NAME|option:value|option:value}
//! ```
//!
//! | Name            | Options                                    | Value                        |
//! |-----------------|--------------------------------------------|------------------------------|
//! | `CONFIG`        | `value-of`                                 | configuration value          |
//! | `ENV`           | `value-of`, `default`                      | environment variable         |
//! | `ARG`           | `value-of`, `default`                      | named hook argument          |
//! | `BRANCH`        |                                            | current branch               |
//! | `STAGED_FILES`  | `of-type`, `in-dir`, `separated-by`        | staged files                 |
//! | `CHANGED_FILES` | `of-type`, `in-dir`, `separated-by`        | changed, unstaged files      |
//!
//! Unknown placeholders and values that cannot be determined expand to an
//! empty string.

use crate::condition::builtin::has_extension;
use crate::context::HookContext;
use bosun_config::Options;
use bosun_config::placeholder::resolve_placeholder;
use bosun_config::settings::value_to_string;
use regex::{Captures, Regex};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\$([A-Z_]+)((?:\|[^|}]*)*)\}").expect("placeholder regex is valid")
});

/// Expand every placeholder in `template`
#[must_use]
pub fn expand(template: &str, ctx: &HookContext<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            let options = parse_options(caps.get(2).map_or("", |m| m.as_str()));
            replacement(name, &options, ctx)
        })
        .into_owned()
}

/// `|key:value|key:value` → options map
fn parse_options(raw: &str) -> Options {
    raw.split('|')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once(':') {
            Some((key, value)) => (key.trim().to_string(), Value::String(value.to_string())),
            None => (part.trim().to_string(), Value::String(String::new())),
        })
        .collect()
}

fn option<'o>(options: &'o Options, key: &str) -> Option<&'o str> {
    options.get(key).and_then(Value::as_str)
}

fn replacement(name: &str, options: &Options, ctx: &HookContext<'_>) -> String {
    let default = || option(options, "default").unwrap_or_default().to_string();
    match name {
        "CONFIG" => resolve_placeholder(options, ctx.config()),
        "ENV" => option(options, "value-of")
            .and_then(|var| std::env::var(var).ok())
            .unwrap_or_else(default),
        "ARG" => option(options, "value-of")
            .and_then(|arg| ctx.arg(arg))
            .map_or_else(default, str::to_owned),
        "BRANCH" => ctx.repository().current_branch().unwrap_or_else(|e| {
            debug!(error = %e, "branch placeholder unavailable");
            String::new()
        }),
        "STAGED_FILES" => file_list(ctx.repository().staged_files(), options),
        "CHANGED_FILES" => file_list(ctx.repository().changed_files(), options),
        other => {
            debug!(placeholder = other, "unknown placeholder");
            String::new()
        }
    }
}

fn file_list(files: bosun_core::Result<Vec<PathBuf>>, options: &Options) -> String {
    let files = match files {
        Ok(files) => files,
        Err(e) => {
            debug!(error = %e, "file placeholder unavailable");
            return String::new();
        }
    };
    let of_type = option(options, "of-type").filter(|s| !s.is_empty());
    let in_dir = option(options, "in-dir")
        .map(|dir| dir.trim_end_matches('/'))
        .filter(|s| !s.is_empty());
    let separator = options
        .get("separated-by")
        .map_or_else(|| " ".to_string(), value_to_string);

    files
        .iter()
        .filter(|file| of_type.is_none_or(|ext| has_extension(file, ext)))
        .filter(|file| in_dir.is_none_or(|dir| file.starts_with(dir)))
        .map(|file| file.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&separator)
}
