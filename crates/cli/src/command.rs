//! Subcommand trait
//!
//! Subcommands that need the loaded configuration implement [`Command`] and
//! receive the shared [`RuntimeContext`]. Tests build the context with
//! [`RuntimeContext::from_parts`] and an in-memory repository.

use crate::common::RuntimeContext;
use crate::error::Result;

/// A subcommand working on a loaded configuration
///
/// ```rust,ignore
/// #[derive(Debug, Args)]
/// pub struct StatusCommand;
///
/// impl Command for StatusCommand {
///     type Output = usize;
///
///     fn execute(&self, context: &RuntimeContext) -> Result<usize> {
///         Ok(context.config.enabled_hooks().count())
///     }
/// }
/// ```
pub trait Command {
    /// Value handed back to the caller, `()` for most commands
    type Output;

    /// Run the subcommand
    ///
    /// # Errors
    ///
    /// Configuration errors, invalid hook names and failing hooks.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
