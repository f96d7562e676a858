//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with an isolated home and repository
//! - Command builder helpers for common patterns
//! - Filesystem inspection helpers

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak the developer's setup into tests.
const ISOLATED_VARS: [&str; 6] = [
    "DOTREPO_REPO",
    "DOTREPO_HOME",
    "DOTREPO_CATEGORIES",
    "DOTREPO_DEFAULT_PLUGIN",
    "DOTREPO_CONFLICT_POLICY",
    "DOTREPO_LOG_MODE",
];

/// Test environment with an isolated home directory and repository.
///
/// `HOME` is pointed at the sandbox home for every command, so the user
/// configuration file is looked up inside the sandbox too.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Sandbox home directory
    pub home: PathBuf,
    /// Sandbox repository root
    pub repo: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with empty home and repo directories.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let home = temp_dir.path().join("home");
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(&home).expect("Failed to create home");
        fs::create_dir_all(&repo).expect("Failed to create repo");

        Self {
            temp_dir,
            home,
            repo,
        }
    }

    /// Create a test environment whose repository is already initialized
    /// with the given filelist.
    pub fn with_filelist(filelist: &str) -> Self {
        let env = Self::new();
        env.write_filelist(filelist);
        fs::create_dir_all(env.repo.join("dotfiles")).expect("Failed to create store");
        env
    }

    /// Get a bare command builder with only the sandbox environment set.
    ///
    /// Use this when testing how `--repo` and `--home` are resolved.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("dotrepo").expect("Failed to find dotrepo binary");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", &self.home);
        cmd
    }

    /// Get a command builder with `--repo` and `--home` pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--repo").arg(&self.repo).arg("--home").arg(&self.home);
        cmd
    }

    /// Replace the repository filelist.
    pub fn write_filelist(&self, content: &str) {
        fs::write(self.repo.join("filelist"), content).expect("Failed to write filelist");
    }

    /// Store location of `name` under `category`.
    pub fn cat(&self, category: &str, name: &str) -> PathBuf {
        self.repo.join("dotfiles/plain").join(category).join(name)
    }

    /// Home location of `name`.
    pub fn home_file(&self, name: &str) -> PathBuf {
        self.home.join(name)
    }

    /// Run a command that must succeed and return its stdout.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run dotrepo");

        assert!(
            output.status.success(),
            "dotrepo {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
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
