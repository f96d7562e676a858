//! Common test utilities for integration tests.
//!
//! This module provides a sandboxed home and repository pair and helpers
//! for arranging and inspecting files in it.

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use dotrepo::{
    AlwaysKeep, AlwaysReplace, ExecutionResult, Executor, OperationQueue, PluginRegistry,
    TrackedPath,
};
use tempfile::TempDir;

/// A temporary home directory and repository with a plain plugin store at
/// `<repo>/dotfiles/plain`.
pub struct Sandbox {
    _dir: TempDir,
    pub home: PathBuf,
    pub repo: PathBuf,
    pub registry: PluginRegistry,
}

#[allow(dead_code)]
impl Sandbox {
    /// Creates empty home and repository directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let repo = dir.path().join("repo");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&repo).unwrap();
        let registry = PluginRegistry::plain(repo.join("dotfiles"), &home).unwrap();
        Self {
            _dir: dir,
            home,
            repo,
            registry,
        }
    }

    /// Store location of `name` under `category`.
    pub fn cat(&self, category: &str, name: &str) -> PathBuf {
        self.repo.join("dotfiles").join("plain").join(category).join(name)
    }

    /// Home location of `name`.
    pub fn home_file(&self, name: &str) -> PathBuf {
        self.home.join(name)
    }

    /// Applies `queue`, replacing on every conflict.
    pub fn apply_replacing(&self, queue: OperationQueue) -> ExecutionResult {
        let mut executor = Executor::new(&self.registry).with_prompter(AlwaysReplace);
        queue.apply(&mut executor).unwrap()
    }

    /// Applies `queue`, declining every conflict.
    pub fn apply_keeping(&self, queue: OperationQueue) -> ExecutionResult {
        let mut executor = Executor::new(&self.registry).with_prompter(AlwaysKeep);
        queue.apply(&mut executor).unwrap()
    }
}

/// Writes `content` to `path`, creating parent directories.
#[allow(dead_code)]
pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Creates a symlink at `at` with literal target `target`.
#[allow(dead_code)]
pub fn link(target: impl AsRef<Path>, at: &Path) {
    fs::create_dir_all(at.parent().unwrap()).unwrap();
    symlink(target, at).unwrap();
}

/// Whether `path` is itself a symlink.
#[allow(dead_code)]
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

/// Whether `path` is a regular file and not a symlink.
#[allow(dead_code)]
pub fn is_real_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_file())
}

/// Whether both paths resolve to the same file.
#[allow(dead_code)]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// A one-entry filelist for `name` under `categories`.
#[allow(dead_code)]
pub fn tracked(name: &str, categories: &[&str]) -> Vec<TrackedPath> {
    vec![TrackedPath::new(name, categories.iter().copied()).unwrap()]
}
