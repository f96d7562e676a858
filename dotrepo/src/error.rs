//! Error types for the dotrepo library.
//!
//! This module provides the error hierarchy for planning and applying
//! convergence operations, using `thiserror` for ergonomic error handling.
//!
//! Missing content and declined conflicts are not errors: the planner
//! records them as warnings on the queue and the executor reports skipped
//! operations. Only failures the caller has to act on surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a dotrepo error.
///
/// # Examples
///
/// ```
/// use dotrepo::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the dotrepo library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid tracked or configured path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// Content required by the caller could not be found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Applying an operation against the live filesystem failed.
    ///
    /// Operations before `index` were applied, operations after it were
    /// not attempted.
    #[error(
        "operation {} of {} failed ({operation}): {source}",
        .index + 1,
        .completed.len() + 1 + .not_attempted.len()
    )]
    Execution {
        /// Zero-based position of the failed operation in the queue.
        index: usize,
        /// Description of the failed operation.
        operation: String,
        /// Descriptions of operations that completed before the failure.
        completed: Vec<String>,
        /// Descriptions of operations that were never attempted.
        not_attempted: Vec<String>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A storage plugin broke its contract.
    #[error("storage plugin '{plugin}' violated its contract: {details}")]
    ContractViolation {
        /// Name of the offending plugin.
        plugin: String,
        /// What went wrong.
        details: String,
    },

    /// A tracked path references a plugin that is not registered.
    #[error("unknown storage plugin '{name}'")]
    UnknownPlugin {
        /// The unregistered plugin name.
        name: String,
    },

    /// The filelist could not be parsed.
    #[error("filelist line {line}: {message}")]
    Filelist {
        /// One-based line number.
        line: usize,
        /// A description of the problem.
        message: String,
    },

    /// A configuration or argument value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration file {}: {source}", path.display())]
    Configuration {
        /// The offending file.
        path: PathBuf,
        /// The YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An I/O error occurred outside of queue execution.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error indicates missing content.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotrepo::Error;
    ///
    /// let err = Error::NotFound { resource: ".vimrc".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error came from applying an operation queue.
    #[must_use]
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }

    /// Check if error is a storage plugin contract violation.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }
}
