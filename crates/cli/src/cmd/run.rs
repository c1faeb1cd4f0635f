//! Run command implementation
//!
//! Executes the actions configured for a hook. Installed hook scripts call
//! `bosun run <hook> "$@"` so the positional arguments git passes are
//! available to placeholders and conditions.

use clap::Args;
use tracing::debug;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::{TerminalReporter, Theme};
use bosun_config::Verbosity;
use bosun_engine::{HookRunner, RunReport};

/// Run command
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Hook to run, e.g. pre-commit
    #[arg(value_name = "HOOK")]
    pub hook: String,

    /// Arguments git passed to the hook
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Command for RunCommand {
    type Output = RunReport;

    fn execute(&self, context: &RuntimeContext) -> Result<RunReport> {
        let config = context.config.as_ref();
        let theme = Theme::for_stdout(config.ansi_colors());
        let reporter = TerminalReporter::new(theme, config.verbosity());

        let runner = HookRunner::builder(config, context.repository())
            .working_dir(context.working_dir())
            .reporter(&reporter)
            .build();
        let report = runner.run(&self.hook, &self.args)?;

        if !report.enabled {
            debug!(hook = %report.hook, "hook is not enabled");
            if config.verbosity() >= Verbosity::Verbose {
                println!("{}", theme.dimmed(&format!("bosun: {} is disabled", report.hook)));
            }
            return Ok(report);
        }

        report.ensure_success()?;
        Ok(report)
    }
}
