//! Deferred filesystem operations.
//!
//! This module defines the operations the planner emits and the ordered
//! queue that carries them to the executor, without performing them.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::location::LocationState;

use super::executor::{ExecutionResult, Executor};

/// How an accepted [`Operation::PromptReplace`] fills the location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "with", content = "plugin")]
pub enum Materialize {
    /// Create a symlink whose target is the replacement path.
    Link,
    /// Write a decoded copy of the replacement, using the named plugin.
    Copy(String),
    /// Write the replacement's raw content encoded by the named plugin.
    Encode(String),
}

/// A single, idempotent unit of filesystem work.
///
/// Operations run in queue order; later operations may rely on earlier
/// ones (a link is only created after the entry in its way was removed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Operation {
    /// Move content from `from` to `to`.
    ///
    /// With `encode_with` set, the bytes at `from` are raw home content and
    /// are encoded by that plugin on the way into the store. Without it the
    /// bytes are moved verbatim (store to store).
    MoveContent {
        /// Source file.
        from: PathBuf,
        /// Destination file.
        to: PathBuf,
        /// Plugin encoding raw content, if any.
        encode_with: Option<String>,
    },

    /// Create a symlink at `at` whose literal target is `target`.
    CreateSymlink {
        /// Link target as written into the link.
        target: PathBuf,
        /// Where the link is created.
        at: PathBuf,
    },

    /// Remove the file or symlink at `at`.
    RemoveEntry {
        /// Entry to remove.
        at: PathBuf,
    },

    /// Ask whether the content at `at` may be discarded in favor of the
    /// replacement; on acceptance remove `at` and materialize it.
    ///
    /// Restore replaces home with the master. Update in copy mode replaces
    /// the master with an edited home copy.
    PromptReplace {
        /// State of `at` when the plan was made.
        existing: LocationState,
        /// Link target or copy source standing in for the master.
        replacement: PathBuf,
        /// The conflicting location.
        at: PathBuf,
        /// How the replacement is materialized.
        materialize: Materialize,
    },

    /// Create an empty master (the plugin's encoding of no bytes).
    CreateEmpty {
        /// Where the empty file is created.
        at: PathBuf,
        /// Plugin encoding the empty content.
        plugin: String,
    },

    /// Write a decoded copy of the stored file `from` to `to`.
    CopyContent {
        /// Stored source file.
        from: PathBuf,
        /// Destination for the raw copy.
        to: PathBuf,
        /// Plugin decoding the stored content.
        plugin: String,
    },
}

impl Operation {
    /// Returns a human-readable description of this operation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MoveContent {
                from,
                to,
                encode_with,
            } => match encode_with {
                Some(plugin) => format!(
                    "move {} to {} (encoded by '{plugin}')",
                    from.display(),
                    to.display()
                ),
                None => format!("move {} to {}", from.display(), to.display()),
            },
            Self::CreateSymlink { target, at } => {
                format!("link {} -> {}", at.display(), target.display())
            }
            Self::RemoveEntry { at } => format!("remove {}", at.display()),
            Self::PromptReplace {
                existing,
                replacement,
                at,
                materialize,
            } => {
                let with = match materialize {
                    Materialize::Link => "a link to",
                    Materialize::Copy(_) => "a copy of",
                    Materialize::Encode(_) => "the content of",
                };
                format!(
                    "ask to replace {} ({existing}) with {with} {}",
                    at.display(),
                    replacement.display()
                )
            }
            Self::CreateEmpty { at, .. } => format!("create empty {}", at.display()),
            Self::CopyContent { from, to, .. } => {
                format!("copy {} to {}", from.display(), to.display())
            }
        }
    }

    /// Whether applying this operation may need a user decision.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        matches!(self, Self::PromptReplace { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// An ordered, inspectable list of deferred operations.
///
/// An empty queue means everything it was planned for is already
/// converged. Warnings collected while planning (paths skipped, masters
/// created from nothing) travel with the queue.
///
/// # Examples
///
/// ```
/// use dotrepo::operations::{Operation, OperationQueue};
/// use std::path::PathBuf;
///
/// let mut queue = OperationQueue::new("update");
/// assert!(queue.is_empty());
///
/// queue.enqueue(Operation::RemoveEntry { at: PathBuf::from("/home/me/.vimrc") });
/// queue.add_warning("unable to find \".zshrc\" in repo, skipping");
///
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.warnings().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationQueue {
    description: String,
    ops: Vec<Operation>,
    warnings: Vec<String>,
}

impl OperationQueue {
    /// Creates an empty queue with the given description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ops: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// What the queue was planned for.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Appends an operation.
    pub fn enqueue(&mut self, op: Operation) {
        self.ops.push(op);
    }

    /// Records a planning warning.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// The queued operations, in execution order.
    #[must_use]
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Warnings collected while planning.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Checks if the queue has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Descriptions of all queued operations.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.ops.iter().map(Operation::description).collect()
    }

    /// Consumes the queue, applying it with `executor`.
    ///
    /// # Errors
    ///
    /// Returns `Execution` if an operation fails; see [`Executor::apply`].
    pub fn apply(self, executor: &mut Executor<'_>) -> Result<ExecutionResult> {
        executor.apply(self)
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Operation>, Vec<String>) {
        (self.description, self.ops, self.warnings)
    }
}
