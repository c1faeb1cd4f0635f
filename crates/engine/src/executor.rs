//! Action execution
//!
//! Commands run through the platform shell in the working directory of the
//! hook. Identifiers starting with `::` are handled in-process.

use crate::context::HookContext;
use bosun_config::Action;
use bosun_config::settings::value_to_string;
use bosun_core::{Error, Result};
use std::fmt::Write as _;

/// Result of running one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the action succeeded
    pub success: bool,
    /// Combined stdout and stderr
    pub output: String,
}

impl ActionOutcome {
    /// A successful outcome
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    /// A failed outcome
    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Runs a single action
///
/// `command` is the action identifier with placeholders already expanded.
/// An `Err` means the action could not be run at all; the runner treats it
/// like a failed outcome.
pub trait ActionExecutor {
    /// Execute the action
    fn execute(&self, action: &Action, command: &str, ctx: &HookContext<'_>)
    -> Result<ActionOutcome>;
}

/// Implement `ActionExecutor` for closures
impl<F> ActionExecutor for F
where
    F: Fn(&Action, &str, &HookContext<'_>) -> Result<ActionOutcome>,
{
    fn execute(
        &self,
        action: &Action,
        command: &str,
        ctx: &HookContext<'_>,
    ) -> Result<ActionOutcome> {
        self(action, command, ctx)
    }
}

/// Default executor: shell commands plus the built-in `::` actions
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ActionExecutor for ShellExecutor {
    #[tracing::instrument(skip(self, action, ctx), fields(action = %action.label()))]
    fn execute(
        &self,
        action: &Action,
        command: &str,
        ctx: &HookContext<'_>,
    ) -> Result<ActionOutcome> {
        if action.is_internal() {
            return run_internal(action, ctx);
        }

        let run = ctx.config().run();
        let command = if run.is_containerized() && !run.exec.is_empty() {
            format!("{} {command}", run.exec)
        } else {
            command.to_string()
        };

        tracing::debug!(working_dir = %ctx.working_dir().display(), "running command");
        let output = shell(&command)
            .dir(ctx.working_dir())
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|e| Error::ActionFailed {
                action: action.label().to_string(),
                message: format!("failed to start '{command}': {e}"),
            })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(ActionOutcome {
            success: output.status.success(),
            output: text,
        })
    }
}

#[cfg(windows)]
fn shell(command: &str) -> duct::Expression {
    duct::cmd("cmd", ["/C", command])
}

#[cfg(not(windows))]
fn shell(command: &str) -> duct::Expression {
    duct::cmd("sh", ["-c", command])
}

/// Built-in actions
fn run_internal(action: &Action, ctx: &HookContext<'_>) -> Result<ActionOutcome> {
    match action.action() {
        "::debug.success" => Ok(ActionOutcome::success(debug_report(action, ctx))),
        "::debug.failure" => Ok(ActionOutcome::failure(debug_report(action, ctx))),
        other => Err(Error::ActionFailed {
            action: action.label().to_string(),
            message: format!("unknown built-in action '{other}'"),
        }),
    }
}

fn debug_report(action: &Action, ctx: &HookContext<'_>) -> String {
    let mut report = format!("hook: {}\n", ctx.hook());
    for (name, value) in ctx.args() {
        let _ = writeln!(report, "arg {name}: {value}");
    }
    for (key, value) in action.options() {
        let _ = writeln!(report, "option {key}: {}", value_to_string(value));
    }
    report
}
