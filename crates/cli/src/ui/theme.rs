//! Colors for terminal output
//!
//! Coloring is switched off entirely when the `ansi-colors` setting is false
//! or stdout is not a terminal.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Output theme
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colors: bool,
}

impl Theme {
    /// Create a theme; `colors` false renders every style as plain text
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Theme for stdout, colored only when enabled and stdout is a terminal
    pub fn for_stdout(ansi_colors: bool) -> Self {
        Self::new(ansi_colors && std::io::stdout().is_terminal())
    }

    /// Whether styles produce ANSI sequences
    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red().bold().to_string())
    }

    pub fn highlight(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan().to_string())
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, |t| t.bright_white().bold().to_string())
    }

    pub fn dimmed(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.colors {
            style(text)
        } else {
            text.to_string()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(true)
    }
}
