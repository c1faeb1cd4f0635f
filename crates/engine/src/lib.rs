//! # Bosun Engine
//!
//! Runs the actions configured for a git hook.
//!
//! - **Context**: the hook, its named arguments and the repository being worked on
//! - **Conditions**: built-in and registered conditions, composed with `AND`/`OR`
//! - **Commands**: placeholder expansion for action commands
//! - **Execution**: shell execution with per-action and global failure policy
//! - **Git**: repository inspection backed by libgit2

pub mod command;
pub mod condition;
pub mod context;
pub mod executor;
pub mod git;
pub mod runner;

// Re-export error types from core
pub use bosun_core::{Error, Result};

// Re-export commonly used types
pub use condition::{ConditionEvaluator, ConditionHandler, ConditionRegistry};
pub use context::HookContext;
pub use executor::{ActionExecutor, ActionOutcome, ShellExecutor};
pub use git::Git2Inspector;
pub use runner::{ActionResult, ActionStatus, HookRunner, HookRunnerBuilder, Reporter, RunReport};
