//! Terminal progress for hook runs

use super::icons::StatusIcon;
use super::theme::Theme;
use bosun_config::Verbosity;
use bosun_core::Hook;
use bosun_engine::{ActionResult, ActionStatus, Reporter};

/// Prints action results as they finish
///
/// | Verbosity | Printed                                        |
/// |-----------|------------------------------------------------|
/// | quiet     | failures with their output                     |
/// | normal    | every executed action, output of failures      |
/// | verbose   | output of every action                         |
/// | debug     | skipped actions as well                        |
pub struct TerminalReporter {
    theme: Theme,
    verbosity: Verbosity,
}

impl TerminalReporter {
    /// Create a reporter
    pub fn new(theme: Theme, verbosity: Verbosity) -> Self {
        Self { theme, verbosity }
    }

    /// Header line for a hook run, `None` when nothing should be printed
    pub fn format_header(&self, hook: Hook, actions: usize) -> Option<String> {
        if self.verbosity < Verbosity::Normal {
            return None;
        }
        let noun = if actions == 1 { "action" } else { "actions" };
        Some(format!(
            "{} {} {}",
            StatusIcon::Hook.get(),
            self.theme.heading(&format!("bosun: {hook}")),
            self.theme.dimmed(&format!("({actions} {noun})"))
        ))
    }

    /// Lines for one action result, empty when nothing should be printed
    pub fn format_result(&self, result: &ActionResult) -> Vec<String> {
        let (icon, status, failed) = match result.status {
            ActionStatus::Skipped => {
                if self.verbosity < Verbosity::Debug {
                    return Vec::new();
                }
                (StatusIcon::Skipped, self.theme.dimmed("skipped"), false)
            }
            ActionStatus::Succeeded => {
                if self.verbosity < Verbosity::Normal {
                    return Vec::new();
                }
                (StatusIcon::Success, self.theme.success("done"), false)
            }
            ActionStatus::Failed { tolerated: true } => (
                StatusIcon::Warning,
                self.theme.warning("failed (allowed)"),
                true,
            ),
            ActionStatus::Failed { tolerated: false } => {
                (StatusIcon::Error, self.theme.error("failed"), true)
            }
        };

        let mut lines = vec![format!(
            "  {} {}: {status}",
            icon.get(),
            self.theme.highlight(&result.label)
        )];
        if failed || self.verbosity >= Verbosity::Verbose {
            lines.extend(
                result
                    .output
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| format!("      {line}")),
            );
        }
        lines
    }
}

impl Reporter for TerminalReporter {
    fn hook_started(&self, hook: Hook, actions: usize) {
        if let Some(header) = self.format_header(hook, actions) {
            println!("{header}");
        }
    }

    fn action_finished(&self, result: &ActionResult) {
        for line in self.format_result(result) {
            println!("{line}");
        }
    }
}
