//! Bosun CLI library
//!
//! This library contains all the CLI logic for bosun, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use bosun_config::settings;
use bosun_config::{DEFAULT_FILE_NAME, Settings};
use command::Command;
use common::RuntimeContext;

/// Bosun - git hook manager
#[derive(Parser)]
#[command(name = "bosun")]
#[command(about = "Run git hook actions from a declarative configuration")]
#[command(version)]
#[command(long_about = "Run git hook actions from a declarative configuration

Hooks, their actions and the conditions under which actions run are declared
in bosun.json (or a .toml document). Installed hook scripts call
`bosun run <hook> \"$@\"`.

Features:
  • Shared configuration through includes
  • Virtual hooks (post-change) covering several git hooks
  • Conditions on branch, staged files and custom values
  • Placeholders for configuration values, hook arguments and files")]
pub struct Cli {
    /// Path to the configuration document
    #[arg(
        long,
        global = true,
        env = "BOSUN_CONFIGURATION",
        value_name = "FILE",
        default_value = DEFAULT_FILE_NAME
    )]
    pub configuration: PathBuf,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, global = true, env = "BOSUN_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Override the git directory setting
    #[arg(long, global = true, value_name = "DIR")]
    pub git_directory: Option<String>,

    /// Override the bootstrap setting
    #[arg(long, global = true, value_name = "FILE")]
    pub bootstrap: Option<String>,

    /// Override the interpreter path setting
    #[arg(long, global = true, value_name = "PATH")]
    pub interpreter_path: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Setting overrides given on the command line
    pub fn overrides(&self) -> Settings {
        let mut overrides = Settings::new();
        for (key, value) in [
            (settings::GIT_DIR, &self.git_directory),
            (settings::BOOTSTRAP, &self.bootstrap),
            (settings::INTERPRETER_PATH, &self.interpreter_path),
        ] {
            if let Some(value) = value {
                overrides.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if self.no_color {
            overrides.insert(settings::COLORS.to_string(), Value::Bool(false));
        }
        overrides
    }
}

/// Available commands for bosun CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Run the actions configured for a hook
    Run(cmd::run::RunCommand),

    /// Display the merged configuration
    Info(cmd::info::InfoCommand),

    /// Write the merged configuration as a single document
    Export(cmd::export::ExportCommand),

    /// Check whether a hook is enabled
    Enabled(cmd::enabled::EnabledCommand),
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - Configuration loading fails
/// - Command execution fails, including hooks with failing actions
pub fn run(cli: Cli) -> Result<()> {
    bosun_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let context = RuntimeContext::load(&cli.configuration, cli.overrides())?;

    match cli.command {
        Commands::Run(run_cmd) => {
            run_cmd.execute(&context)?;
        }
        Commands::Info(info_cmd) => {
            info_cmd.execute(&context)?;
        }
        Commands::Export(export_cmd) => {
            export_cmd.execute(&context)?;
        }
        Commands::Enabled(enabled_cmd) => {
            enabled_cmd.execute(&context)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_passes_hook_arguments() {
        let cli = Cli::try_parse_from([
            "bosun",
            "run",
            "prepare-commit-msg",
            ".git/COMMIT_EDITMSG",
            "-m",
        ])
        .unwrap();

        let Commands::Run(run_cmd) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(run_cmd.hook, "prepare-commit-msg");
        assert_eq!(run_cmd.args, vec![".git/COMMIT_EDITMSG", "-m"]);
    }

    #[test]
    fn test_default_configuration_path() {
        let cli = Cli::try_parse_from(["bosun", "info"]).unwrap();

        assert_eq!(cli.configuration, PathBuf::from(DEFAULT_FILE_NAME));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "bosun",
            "--bootstrap",
            "vendor/boot.sh",
            "--no-color",
            "enabled",
            "pre-commit",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides["bootstrap"], "vendor/boot.sh");
        assert_eq!(overrides["ansi-colors"], false);
        assert!(!overrides.contains_key("git-directory"));
    }

    #[test]
    fn test_info_flags() {
        let cli =
            Cli::try_parse_from(["bosun", "info", "--hook", "pre-push", "-e", "-o", "-c", "-s"])
                .unwrap();

        let Commands::Info(info_cmd) = cli.command else {
            panic!("expected info command");
        };
        assert_eq!(info_cmd.hook.as_deref(), Some("pre-push"));
        assert!(info_cmd.extensive && info_cmd.options && info_cmd.conditions);
        assert!(info_cmd.action_settings);
    }
}
