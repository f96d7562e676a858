//! Queue execution engine.
//!
//! This module implements the executor that takes an [`OperationQueue`]
//! and applies it to the filesystem, strictly in order. It is the only
//! part of the library that mutates the home directory or the store.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::error::{Error, Result};
use crate::plugin::{PluginRegistry, StoragePlugin};

use super::prompt::{AlwaysKeep, Conflict, Decision, Prompter};
use super::queue::{Materialize, Operation, OperationQueue};

/// Result of applying a queue.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// What the queue was planned for.
    pub description: String,

    /// Whether this was a dry run (nothing touched).
    pub dry_run: bool,

    /// Descriptions of operations that were applied (or would be, in a
    /// dry run).
    pub applied: Vec<String>,

    /// Descriptions of replacements the prompter declined.
    pub skipped: Vec<String>,

    /// Warnings carried over from planning.
    pub warnings: Vec<String>,
}

impl ExecutionResult {
    /// Whether nothing was (or would be) changed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

enum Outcome {
    Applied,
    Skipped,
}

/// Applies operation queues against the filesystem.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (logging what would happen). Conflicts are decided by the configured
/// [`Prompter`]; the default declines every replacement.
///
/// # Examples
///
/// ```
/// use dotrepo::operations::{AlwaysReplace, Executor, Operation, OperationQueue};
/// use dotrepo::plugin::PluginRegistry;
///
/// let dir = tempfile::tempdir().unwrap();
/// let registry = PluginRegistry::plain(dir.path().join("store"), dir.path().join("home")).unwrap();
///
/// let mut queue = OperationQueue::new("example");
/// queue.enqueue(Operation::CreateEmpty {
///     at: dir.path().join("store/plain/common/.vimrc"),
///     plugin: "plain".into(),
/// });
///
/// // Dry run touches nothing
/// let mut executor = Executor::new(&registry).dry_run();
/// let result = executor.apply(queue.clone()).unwrap();
/// assert!(result.dry_run);
/// assert!(!dir.path().join("store/plain/common/.vimrc").exists());
///
/// // Normal execution
/// let mut executor = Executor::new(&registry).with_prompter(AlwaysReplace);
/// let result = executor.apply(queue).unwrap();
/// assert_eq!(result.applied.len(), 1);
/// assert!(dir.path().join("store/plain/common/.vimrc").is_file());
/// ```
pub struct Executor<'a> {
    registry: &'a PluginRegistry,
    prompter: Box<dyn Prompter + 'a>,
    dry_run: bool,
}

impl<'a> Executor<'a> {
    /// Creates an executor that declines every conflict.
    #[must_use]
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self {
            registry,
            prompter: Box::new(AlwaysKeep),
            dry_run: false,
        }
    }

    /// Sets the executor to dry-run mode.
    ///
    /// In dry-run mode every operation is logged as `would ...`, the
    /// filesystem is not touched, and the prompter is never consulted.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Sets dry-run mode from a flag.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the capability that decides conflicts.
    #[must_use]
    pub fn with_prompter(mut self, prompter: impl Prompter + 'a) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Applies every operation of `queue` in order.
    ///
    /// # Errors
    ///
    /// Returns `Execution` on the first failing operation. The error lists
    /// the operations that completed and those that were not attempted;
    /// nothing after the failure is run.
    pub fn apply(&mut self, queue: OperationQueue) -> Result<ExecutionResult> {
        let (description, ops, warnings) = queue.into_parts();
        let mut result = ExecutionResult {
            description,
            dry_run: self.dry_run,
            warnings,
            ..ExecutionResult::default()
        };

        if self.dry_run {
            for op in &ops {
                let description = op.description();
                log::info!("would {description}");
                result.applied.push(description);
            }
            return Ok(result);
        }

        let mut completed: Vec<String> = Vec::new();
        for (index, op) in ops.iter().enumerate() {
            let description = op.description();
            match self.apply_one(op) {
                Ok(Outcome::Applied) => {
                    log::info!("{description}");
                    result.applied.push(description.clone());
                }
                Ok(Outcome::Skipped) => {
                    result.skipped.push(description.clone());
                }
                Err(source) => {
                    log::error!("failed to {description}: {source}");
                    return Err(Error::Execution {
                        index,
                        operation: description,
                        completed,
                        not_attempted: ops[index + 1..]
                            .iter()
                            .map(Operation::description)
                            .collect(),
                        source,
                    });
                }
            }
            completed.push(description);
        }

        Ok(result)
    }

    fn apply_one(&mut self, op: &Operation) -> io::Result<Outcome> {
        match op {
            Operation::MoveContent {
                from,
                to,
                encode_with,
            } => {
                let plugin = match encode_with {
                    Some(name) => Some(self.plugin(name)?),
                    None => None,
                };
                move_content(from, to, plugin)?;
            }
            Operation::CreateSymlink { target, at } => create_symlink(target, at)?,
            Operation::RemoveEntry { at } => remove_entry(at)?,
            Operation::CreateEmpty { at, plugin } => {
                let plugin = self.plugin(plugin)?;
                create_empty(at, plugin)?;
            }
            Operation::CopyContent { from, to, plugin } => {
                let plugin = self.plugin(plugin)?;
                copy_content(from, to, plugin)?;
            }
            Operation::PromptReplace {
                existing,
                replacement,
                at,
                materialize,
            } => {
                let conflict = Conflict {
                    at: at.clone(),
                    existing: existing.clone(),
                    replacement: replacement.clone(),
                    materialize: materialize.clone(),
                };
                if self.prompter.confirm(&conflict) == Decision::Keep {
                    log::warn!(
                        "keeping divergent \"{}\" (replacement declined)",
                        at.display()
                    );
                    return Ok(Outcome::Skipped);
                }

                remove_entry(at)?;
                match materialize {
                    Materialize::Link => create_symlink(replacement, at)?,
                    Materialize::Copy(name) => {
                        let plugin = self.plugin(name)?;
                        copy_content(replacement, at, plugin)?;
                    }
                    Materialize::Encode(name) => {
                        let plugin = self.plugin(name)?;
                        store_content(replacement, at, plugin)?;
                    }
                }
            }
        }
        Ok(Outcome::Applied)
    }

    fn plugin(&self, name: &str) -> io::Result<&'a dyn StoragePlugin> {
        self.registry.get(name).map_err(io::Error::other)
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn move_content(from: &Path, to: &Path, encode_with: Option<&dyn StoragePlugin>) -> io::Result<()> {
    // Already moved by an earlier run.
    if !exists(from)? && exists(to)? {
        return Ok(());
    }

    ensure_parent(to)?;
    match encode_with {
        Some(plugin) if !plugin.is_passthrough() => {
            let raw = fs::read(from)?;
            let stored = plugin.encode(&raw).map_err(io::Error::other)?;
            fs::write(to, stored)?;
            fs::remove_file(from)
        }
        _ => match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if crosses_devices(&e) => {
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            Err(e) => Err(e),
        },
    }
}

/// Home and store live on different filesystems.
#[cfg(unix)]
fn crosses_devices(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn crosses_devices(_e: &io::Error) -> bool {
    false
}

fn create_symlink(target: &Path, at: &Path) -> io::Result<()> {
    match fs::read_link(at) {
        Ok(current) if current == target => return Ok(()),
        Ok(_) => {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already links elsewhere", at.display()),
            ))
        }
        Err(_) if exists(at)? => {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists", at.display()),
            ))
        }
        Err(_) => {}
    }

    ensure_parent(at)?;
    symlink(target, at)
}

#[cfg(unix)]
fn symlink(target: &Path, at: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, at)
}

#[cfg(windows)]
fn symlink(target: &Path, at: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, at)
}

fn remove_entry(at: &Path) -> io::Result<()> {
    match fs::symlink_metadata(at) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
        Ok(metadata) if metadata.is_dir() => Err(io::Error::other(format!(
            "refusing to remove directory {}",
            at.display()
        ))),
        Ok(_) => fs::remove_file(at),
    }
}

fn create_empty(at: &Path, plugin: &dyn StoragePlugin) -> io::Result<()> {
    if fs::symlink_metadata(at).is_ok_and(|m| m.is_file()) {
        return Ok(());
    }
    ensure_parent(at)?;
    let stored = plugin.encode(&[]).map_err(io::Error::other)?;
    fs::write(at, stored)
}

fn copy_content(from: &Path, to: &Path, plugin: &dyn StoragePlugin) -> io::Result<()> {
    if fs::symlink_metadata(to).is_ok_and(|m| m.file_type().is_symlink()) {
        return Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("refusing to write through symlink {}", to.display()),
        ));
    }
    let stored = fs::read(from)?;
    let raw = plugin.decode(&stored).map_err(io::Error::other)?;
    ensure_parent(to)?;
    fs::write(to, raw)
}

/// Writes the raw file `from` into the store at `to`, keeping `from`.
fn store_content(from: &Path, to: &Path, plugin: &dyn StoragePlugin) -> io::Result<()> {
    let raw = fs::read(from)?;
    let stored = plugin.encode(&raw).map_err(io::Error::other)?;
    ensure_parent(to)?;
    fs::write(to, stored)
}
