//! Info command implementation
//!
//! Display the merged configuration: settings, custom values, run and plugin
//! configuration, and the actions of each hook.

use clap::Args;
use std::fmt::Write as _;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::{StatusIcon, Theme};
use bosun_config::settings::value_to_string;
use bosun_config::{Action, Condition, Configuration, HookConfig, Settings};
use bosun_core::RepositoryInspector;

const NOT_FOUND: &str = "not found";

/// Info command
#[derive(Debug, Default, Args)]
pub struct InfoCommand {
    /// Only show this hook
    #[arg(long, value_name = "HOOK")]
    pub hook: Option<String>,

    /// Show every hook with its enabled and installed state
    #[arg(short, long)]
    pub extensive: bool,

    /// Show action options
    #[arg(short, long)]
    pub options: bool,

    /// Show action conditions
    #[arg(short, long)]
    pub conditions: bool,

    /// Show per-action settings
    #[arg(short = 's', long)]
    pub action_settings: bool,
}

impl Command for InfoCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let theme = Theme::for_stdout(context.config.ansi_colors());
        print!("{}", self.render(&context.config, context.repository(), theme)?);
        Ok(())
    }
}

impl InfoCommand {
    /// Render the report
    pub fn render(
        &self,
        config: &Configuration,
        repository: &dyn RepositoryInspector,
        theme: Theme,
    ) -> Result<String> {
        let hooks: Vec<&HookConfig> = match &self.hook {
            Some(name) => vec![config.hook_config(name)?],
            None => config
                .hooks()
                .filter(|hook| self.extensive || hook.is_enabled() || hook.has_actions())
                .collect(),
        };

        let mut out = String::new();
        section(&mut out, theme, "Configuration");
        let (path, note) = if config.is_loaded_from_file() {
            (config.path().display().to_string(), None)
        } else {
            (config.path().display().to_string(), Some(NOT_FOUND))
        };
        row(&mut out, theme, "Path", &path, note);
        row(
            &mut out,
            theme,
            "Git directory",
            &config.git_directory().display().to_string(),
            None,
        );
        row(&mut out, theme, "Verbosity", config.verbosity().as_str(), None);
        out.push('\n');

        if !config.settings().is_empty() {
            section(&mut out, theme, "Settings");
            settings_rows(&mut out, theme, config.settings());
            out.push('\n');
        }

        if !config.custom().is_empty() {
            section(&mut out, theme, "Custom");
            settings_rows(&mut out, theme, config.custom());
            out.push('\n');
        }

        let run = config.run();
        if !run.is_default() {
            section(&mut out, theme, "Run");
            row(&mut out, theme, "Mode", run.mode.as_str(), None);
            for (label, value) in [("Exec", &run.exec), ("Path", &run.path), ("Git", &run.git)] {
                if !value.is_empty() {
                    row(&mut out, theme, label, value, None);
                }
            }
            out.push('\n');
        }

        if !config.plugins().is_empty() {
            section(&mut out, theme, "Plugins");
            for plugin in config.plugins() {
                row(&mut out, theme, "Plugin", &plugin.plugin, None);
                for (key, value) in &plugin.options {
                    let _ = writeln!(out, "      {key}: {}", value_to_string(value));
                }
            }
            out.push('\n');
        }

        section(&mut out, theme, "Hooks");
        if hooks.is_empty() {
            let _ = writeln!(out, "  {}", theme.dimmed("no hooks configured"));
        }
        for hook in hooks {
            self.render_hook(&mut out, theme, hook, repository);
        }

        Ok(out)
    }

    fn render_hook(
        &self,
        out: &mut String,
        theme: Theme,
        hook: &HookConfig,
        repository: &dyn RepositoryInspector,
    ) {
        let icon = if hook.is_enabled() {
            StatusIcon::Success
        } else {
            StatusIcon::Skipped
        };
        let mut line = format!("  {} {}", icon.get(), theme.highlight(hook.name()));
        if self.extensive {
            let enabled = if hook.is_enabled() { "enabled" } else { "disabled" };
            let installed = if repository.hook_installed(hook.hook()) {
                theme.success("installed")
            } else {
                theme.warning("not installed")
            };
            let _ = write!(line, " {} {installed}", theme.dimmed(enabled));
        }
        let _ = writeln!(out, "{line}");

        if !hook.has_actions() {
            let _ = writeln!(out, "      {}", theme.dimmed("no actions"));
        }
        for action in hook.actions() {
            self.render_action(out, theme, action);
        }
    }

    fn render_action(&self, out: &mut String, theme: Theme, action: &Action) {
        let origin = if action.is_included() {
            theme.dimmed(" (included)")
        } else {
            String::new()
        };
        let _ = writeln!(out, "      - {}{origin}", action.action());

        if self.options && !action.options().is_empty() {
            let _ = writeln!(out, "        {}", theme.dimmed("options:"));
            for (key, value) in action.options() {
                let _ = writeln!(out, "          {key}: {}", value_to_string(value));
            }
        }

        if self.conditions && !action.conditions().is_empty() {
            let _ = writeln!(out, "        {}", theme.dimmed("conditions:"));
            for condition in action.conditions() {
                condition_tree(out, condition, 5);
            }
        }

        if self.action_settings {
            let _ = writeln!(out, "        {}", theme.dimmed("config:"));
            let _ = writeln!(out, "          label: {}", action.label());
            let _ = writeln!(out, "          allow-failure: {}", action.is_failure_allowed());
        }
    }
}

fn condition_tree(out: &mut String, condition: &Condition, depth: usize) {
    let indent = "  ".repeat(depth);
    match condition {
        Condition::Leaf { exec, args } if args.is_null() => {
            let _ = writeln!(out, "{indent}- {exec}");
        }
        Condition::Leaf { exec, args } => {
            let _ = writeln!(out, "{indent}- {exec} {args}");
        }
        composite => {
            let _ = writeln!(out, "{indent}- {}", composite.exec());
            for child in composite.children() {
                condition_tree(out, child, depth + 1);
            }
        }
    }
}

fn section(out: &mut String, theme: Theme, name: &str) {
    let _ = writeln!(out, "{}", theme.heading(name));
}

fn settings_rows(out: &mut String, theme: Theme, settings: &Settings) {
    for (key, value) in settings {
        row(out, theme, key, &value_to_string(value), None);
    }
}

fn row(out: &mut String, theme: Theme, label: &str, value: &str, note: Option<&str>) {
    match note {
        Some(note) => {
            let _ = writeln!(
                out,
                "  {label:14} {} {}",
                theme.dimmed(value),
                theme.warning(&format!("({note})"))
            );
        }
        None => {
            let _ = writeln!(out, "  {label:14} {value}");
        }
    }
}
