//! Export command implementation
//!
//! Writes the merged configuration as a single document with includes
//! resolved. Loading the exported document yields the same hooks, actions
//! and settings.

use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};
use bosun_config::document::Format;

/// Export command
#[derive(Debug, Default, Args)]
pub struct ExportCommand {
    /// Output syntax (json or toml), defaults to the output file's extension
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    fn resolve_format(&self) -> Result<Format> {
        match self.format.as_deref() {
            Some(name) if name.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(name) if name.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(other) => Err(CommandError::UnsupportedFormat(other.to_string())),
            None => Ok(self
                .output
                .as_deref()
                .map_or(Format::Json, Format::from_path)),
        }
    }
}

impl Command for ExportCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let format = self.resolve_format()?;
        let mut text = context.config.to_document().to_string_as(format)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }

        match &self.output {
            Some(path) => fs::write(path, text).map_err(|source| CommandError::WriteFailed {
                path: path.clone(),
                source,
            })?,
            None => print!("{text}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use bosun_config::{ConfigLoader, Hook};
    use bosun_core::DetachedRepository;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> RuntimeContext {
        fs::write(
            temp.path().join("shared.json"),
            r#"{"pre-push": {"enabled": true, "actions": [{"action": "cargo test"}]}}"#,
        )
        .unwrap();
        let root = temp.path().join("bosun.json");
        fs::write(
            &root,
            r#"{"config": {"includes": ["shared.json"]},
                "pre-commit": {"enabled": true, "actions": [{"action": "cargo fmt"}]}}"#,
        )
        .unwrap();
        let config = ConfigLoader::new().load(&root).unwrap();
        RuntimeContext::from_parts(
            Arc::new(config),
            Box::new(DetachedRepository),
            temp.path().to_path_buf(),
        )
    }

    #[test]
    fn test_export_flattens_includes() {
        let temp = TempDir::new().unwrap();
        let context = context(&temp);
        let output = temp.path().join("flat.json");

        ExportCommand {
            format: None,
            output: Some(output.clone()),
        }
        .execute(&context)
        .unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(!text.contains("shared.json"));
        let reloaded = ConfigLoader::new().load(&output).unwrap();
        assert_eq!(reloaded.hook(Hook::PrePush).actions().len(), 1);
        assert_eq!(reloaded.hook(Hook::PreCommit).actions().len(), 1);
    }

    #[test]
    fn test_format_from_extension() {
        let command = ExportCommand {
            format: None,
            output: Some(PathBuf::from("bosun.toml")),
        };
        assert_eq!(command.resolve_format().unwrap(), Format::Toml);

        let command = ExportCommand::default();
        assert_eq!(command.resolve_format().unwrap(), Format::Json);
    }

    #[test]
    fn test_unsupported_format() {
        let command = ExportCommand {
            format: Some("yaml".into()),
            output: None,
        };

        assert!(matches!(
            command.resolve_format(),
            Err(CommandError::UnsupportedFormat(_))
        ));
    }
}
