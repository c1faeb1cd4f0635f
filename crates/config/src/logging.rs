//! Logging configuration for the bosun CLI
//!
//! Compact terminal output plus an optional file log, using tracing.

use crate::{Error, Result};
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const TARGETS: [&str; 4] = ["bosun", "bosun_config", "bosun_engine", "bosun_cli"];

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging
/// * `log_file` - Optional path to append logs to
///
/// `RUST_LOG` overrides the level derived from `verbose`.
///
/// # Examples
/// ```ignore
/// // Warnings and above
/// init(false, None)?;
///
/// // Debug output, mirrored into a file
/// init(true, Some(Path::new("bosun.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    // Hook output goes to the terminal; logging stays quiet unless asked
    let level = if verbose { "debug" } else { "warn" };

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(
            TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        )
        .map_err(|e| Error::Message(format!("invalid log filter: {e}")))?,
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(true);
    // No timestamps in normal mode
    let stdout_layer = if verbose {
        stdout_layer.with_filter(env_filter).boxed()
    } else {
        stdout_layer.without_time().with_filter(env_filter).boxed()
    };

    match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .with_filter(
                    EnvFilter::try_new("debug")
                        .map_err(|e| Error::Message(format!("invalid log filter: {e}")))?,
                );

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| Error::Message(format!("failed to initialize logging: {e}")))?;
        }
        None => {
            tracing_subscriber::registry()
                .with(stdout_layer)
                .try_init()
                .map_err(|e| Error::Message(format!("failed to initialize logging: {e}")))?;
        }
    }

    Ok(())
}
