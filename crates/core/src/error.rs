//! Base error types for bosun
//!
//! This module provides the foundation error type shared by every bosun crate.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A hook name outside the recognized set was referenced
    #[error("Invalid hook name: {name}")]
    InvalidHookName {
        /// The rejected name
        name: String,
    },

    /// A configuration document could not be read
    #[error("Failed to read configuration {}: {source}", path.display())]
    DocumentRead {
        /// Document location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration document has invalid syntax
    #[error("Failed to parse configuration {}: {message}", path.display())]
    DocumentParse {
        /// Document location
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A configuration document parsed but has an invalid shape
    #[error("Invalid configuration {}: {message}", path.display())]
    InvalidDocument {
        /// Document location
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// An included document does not exist
    #[error("Config to include not found: {} (included from {})", path.display(), included_from.display())]
    IncludeNotFound {
        /// Resolved include path
        path: PathBuf,
        /// Document declaring the include
        included_from: PathBuf,
    },

    /// An include target that cannot be fetched from the filesystem
    #[error("Unsupported include target '{location}': only local files can be included")]
    UnsupportedInclude {
        /// The include entry as written in the document
        location: String,
    },

    /// A setting holds an unusable value
    #[error("Invalid setting '{key}': {message}")]
    InvalidSetting {
        /// Setting key
        key: String,
        /// Why the value was rejected
        message: String,
    },

    /// No condition implementation is registered for an identifier
    #[error("Unknown condition '{exec}'")]
    UnresolvedCondition {
        /// Condition identifier
        exec: String,
    },

    /// A condition implementation could not evaluate its arguments
    #[error("Condition '{exec}' failed: {message}")]
    ConditionFailed {
        /// Condition identifier
        exec: String,
        /// Failure detail
        message: String,
    },

    /// An action could not be started or reported an internal error
    #[error("Action '{action}' failed: {message}")]
    ActionFailed {
        /// Action label
        action: String,
        /// Failure detail
        message: String,
    },

    /// A hook run ended with failing actions
    #[error("Hook '{hook}' failed: {failed} of {total} actions failed")]
    HookFailed {
        /// Hook name
        hook: String,
        /// Number of failed actions
        failed: usize,
        /// Number of actions in the execution list
        total: usize,
    },

    /// Git repository error
    #[error("Git error: {0}")]
    Git(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create an `InvalidHookName` error
    pub fn invalid_hook_name(name: impl Into<String>) -> Self {
        Self::InvalidHookName { name: name.into() }
    }

    /// Create an `InvalidSetting` error
    pub fn invalid_setting(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts configuration loading
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::DocumentRead { .. }
                | Self::DocumentParse { .. }
                | Self::InvalidDocument { .. }
                | Self::IncludeNotFound { .. }
                | Self::UnsupportedInclude { .. }
                | Self::InvalidSetting { .. }
                | Self::InvalidHookName { .. }
        )
    }

    /// Whether this error comes from fetching or reading an included document
    ///
    /// Only these failures may be absorbed when a document's includes all
    /// fail; every other load failure stays fatal.
    #[must_use]
    pub fn is_include_failure(&self) -> bool {
        matches!(
            self,
            Self::DocumentRead { .. }
                | Self::DocumentParse { .. }
                | Self::IncludeNotFound { .. }
                | Self::UnsupportedInclude { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_invalid_hook_name_message() {
        let error = Error::invalid_hook_name("pre-kaboom");

        assert_eq!(error.to_string(), "Invalid hook name: pre-kaboom");
        assert!(error.is_load_failure());
        assert!(!error.is_include_failure());
    }

    #[test]
    fn test_include_failures() {
        let missing = Error::IncludeNotFound {
            path: "shared.json".into(),
            included_from: "bosun.json".into(),
        };
        let remote = Error::UnsupportedInclude {
            location: "https://example.com/bosun.json".into(),
        };

        assert!(missing.is_include_failure());
        assert!(remote.is_include_failure());
        assert!(!Error::invalid_setting("verbosity", "unknown level").is_include_failure());
    }

    #[test]
    fn test_runtime_errors_are_not_load_failures() {
        let error = Error::UnresolvedCondition {
            exec: "branch.on".into(),
        };

        assert!(!error.is_load_failure());
        assert!(error.to_string().contains("branch.on"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: Error = io_error.into();

        assert!(matches!(error, Error::Io(_)));
    }
}
