//! Enabled command implementation
//!
//! Reports whether a hook is enabled, directly or through the virtual hook
//! it triggers.

use clap::Args;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Enabled command
#[derive(Debug, Args)]
pub struct EnabledCommand {
    /// Hook to check
    #[arg(value_name = "HOOK")]
    pub hook: String,

    /// Ignore the virtual hook and only check the hook's own flag
    #[arg(long)]
    pub direct: bool,
}

impl Command for EnabledCommand {
    type Output = bool;

    fn execute(&self, context: &RuntimeContext) -> Result<bool> {
        let enabled = context.config.is_hook_enabled(&self.hook, !self.direct)?;
        println!("{}", if enabled { "enabled" } else { "disabled" });
        Ok(enabled)
    }
}
