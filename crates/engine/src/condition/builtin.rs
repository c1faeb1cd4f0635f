//! Built-in conditions
//!
//! | Identifier                        | Arguments                 |
//! |-----------------------------------|---------------------------|
//! | `branch.on`                       | `name`                    |
//! | `branch.not-on`                   | `name`                    |
//! | `file-staged.any`                 | `files` (list or string)  |
//! | `file-staged.all`                 | `files` (list or string)  |
//! | `file-staged.of-type`             | `type`                    |
//! | `file-changed.any`                | `files` (list or string)  |
//! | `config.custom-value-is-truthy`   | `value` (custom key)      |
//! | `config.custom-value-is-falsy`    | `value` (custom key)      |

use super::ConditionRegistry;
use crate::context::HookContext;
use bosun_config::settings::is_truthy;
use bosun_core::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Add every built-in condition to `registry`
pub fn register(registry: &mut ConditionRegistry) {
    registry.register("branch.on", branch_on);
    registry.register("branch.not-on", branch_not_on);
    registry.register("file-staged.any", file_staged_any);
    registry.register("file-staged.all", file_staged_all);
    registry.register("file-staged.of-type", file_staged_of_type);
    registry.register("file-changed.any", file_changed_any);
    registry.register("config.custom-value-is-truthy", custom_value_is_truthy);
    registry.register("config.custom-value-is-falsy", custom_value_is_falsy);
}

fn branch_on(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let name = arg_str(args, "name", "branch.on")?;
    Ok(ctx.repository().current_branch()? == name)
}

fn branch_not_on(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let name = arg_str(args, "name", "branch.not-on")?;
    Ok(ctx.repository().current_branch()? != name)
}

fn file_staged_any(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let wanted = arg_list(args, "files", "file-staged.any")?;
    let staged = ctx.repository().staged_files()?;
    Ok(wanted.iter().any(|file| contains(&staged, file)))
}

fn file_staged_all(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let wanted = arg_list(args, "files", "file-staged.all")?;
    let staged = ctx.repository().staged_files()?;
    Ok(wanted.iter().all(|file| contains(&staged, file)))
}

fn file_staged_of_type(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let wanted = arg_str(args, "type", "file-staged.of-type")?;
    let staged = ctx.repository().staged_files()?;
    Ok(staged.iter().any(|file| has_extension(file, &wanted)))
}

fn file_changed_any(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let wanted = arg_list(args, "files", "file-changed.any")?;
    let changed = ctx.repository().changed_files()?;
    Ok(wanted.iter().any(|file| contains(&changed, file)))
}

fn custom_value_is_truthy(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let key = arg_str(args, "value", "config.custom-value-is-truthy")?;
    Ok(ctx.config().custom_value(&key).is_some_and(is_truthy))
}

fn custom_value_is_falsy(args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
    let key = arg_str(args, "value", "config.custom-value-is-falsy")?;
    Ok(!ctx.config().custom_value(&key).is_some_and(is_truthy))
}

/// Whether `file` has extension `extension` (a leading `.` is ignored)
pub(crate) fn has_extension(file: &Path, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn contains(files: &[PathBuf], file: &str) -> bool {
    let file = Path::new(file);
    files.iter().any(|candidate| candidate == file)
}

fn arg_str(args: &Value, key: &str, exec: &str) -> Result<String> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(Error::ConditionFailed {
            exec: exec.to_string(),
            message: format!("argument '{key}' must be a string, got {other}"),
        }),
        None => Err(Error::ConditionFailed {
            exec: exec.to_string(),
            message: format!("missing argument '{key}'"),
        }),
    }
}

fn arg_list(args: &Value, key: &str, exec: &str) -> Result<Vec<String>> {
    match args.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_owned).ok_or_else(|| Error::ConditionFailed {
                    exec: exec.to_string(),
                    message: format!("argument '{key}' must only contain strings"),
                })
            })
            .collect(),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()),
        Some(other) => Err(Error::ConditionFailed {
            exec: exec.to_string(),
            message: format!("argument '{key}' must be a list, got {other}"),
        }),
        None => Err(Error::ConditionFailed {
            exec: exec.to_string(),
            message: format!("missing argument '{key}'"),
        }),
    }
}
