//! Configuration management for bosun
//!
//! This crate handles:
//! - Parsing configuration documents (JSON or TOML)
//! - Include resolution and layer merging
//! - The hook, action and condition model
//! - Virtual hook resolution at trigger time
//! - Configuration values for command placeholders
//! - Logging initialization

pub mod action;
pub mod condition;
pub mod config;
pub mod document;
pub mod hook;
pub mod loader;
pub mod logging;
pub mod paths;
pub mod placeholder;
pub mod plugin;
pub mod run;
pub mod settings;

// Re-export error types from core
pub use bosun_core::{Error, Hook, Result};

// Re-export main types
pub use action::{Action, ActionOrigin};
pub use condition::{Condition, ConditionSpec};
pub use config::{Configuration, DEFAULT_FILE_NAME, SETTINGS_FILE_NAME};
pub use document::{ActionSpec, Document, HookSpec};
pub use hook::HookConfig;
pub use loader::ConfigLoader;
pub use placeholder::resolve_config_value;
pub use plugin::PluginConfig;
pub use run::{RunConfig, RunMode};
pub use settings::{Options, Settings, Verbosity};
