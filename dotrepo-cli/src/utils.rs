//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including path resolution, settings and filelist loading, conflict
//! prompting, and run summaries.

use crate::error::CliError;
use dotrepo::config::Config;
use dotrepo::operations::parse_answer;
use dotrepo::paths::expand_tilde;
use dotrepo::{
    AlwaysKeep, AlwaysReplace, ConfigBuilder, Conflict, ConflictPolicy, Decision,
    ExecutionResult, Executor, Filelist, PluginRegistry, Prompter, Settings, TrackedPath,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Repository root (defaults to the current directory).
    pub repo: Option<PathBuf>,

    /// Override the home directory.
    pub home: Option<PathBuf>,

    /// Show what would change without changing anything.
    pub dry_run: bool,

    /// Override the active categories.
    pub categories: Vec<String>,

    /// Override the conflict policy.
    pub policy: Option<ConflictPolicy>,
}

/// Resolve a path, using CWD if not specified.
///
/// Relative paths are joined onto the current directory and `~` is
/// expanded. Symlinks are not followed, so the path need not exist yet.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf, CliError> {
    let cwd = env::current_dir()?;
    match path {
        Some(p) => {
            let expanded = expand_tilde(p)?;
            Ok(if expanded.is_absolute() {
                expanded
            } else {
                cwd.join(expanded)
            })
        }
        None => Ok(cwd),
    }
}

/// Load layered settings for the repository named by the global options.
///
/// Precedence, lowest first: built-in defaults, user config, repository
/// config, `DOTREPO_*` environment variables, command-line flags.
pub fn load_settings(global: &GlobalOptions) -> Result<Settings, CliError> {
    let repo = resolve_path(global.repo.as_deref())?;
    let home = global
        .home
        .as_deref()
        .map(|home| resolve_path(Some(home)))
        .transpose()?;

    let overrides = Config {
        home,
        categories: (!global.categories.is_empty()).then(|| global.categories.clone()),
        conflict_policy: global.policy,
        ..Default::default()
    };

    ConfigBuilder::new(repo)
        .with_config(overrides)
        .build()
        .map_err(CliError::from)
}

/// Build the plugin registry for the configured store and home.
pub fn load_registry(settings: &Settings) -> Result<PluginRegistry, CliError> {
    PluginRegistry::plain(&settings.store_dir, &settings.home).map_err(CliError::from)
}

/// Read the repository filelist.
///
/// # Errors
///
/// Returns `SemanticFailure` if the repository has no filelist yet.
pub fn read_filelist(settings: &Settings) -> Result<Filelist, CliError> {
    if !settings.filelist.is_file() {
        return Err(CliError::SemanticFailure(format!(
            "no filelist at {} (run `dotrepo init` first)",
            settings.filelist.display()
        )));
    }
    Filelist::load(&settings.filelist, &settings.default_plugin).map_err(CliError::from)
}

/// Read the filelist and keep the entries in the active categories.
pub fn load_filelist(settings: &Settings) -> Result<Vec<TrackedPath>, CliError> {
    let filelist = read_filelist(settings)?;
    let active = filelist.activate(&settings.categories);
    log::debug!(
        "{} of {} tracked paths active for categories {}",
        active.len(),
        filelist.len(),
        settings.categories.join(",")
    );
    Ok(active)
}

/// Build an executor that resolves conflicts according to the configured
/// policy.
pub fn build_executor<'a>(
    registry: &'a PluginRegistry,
    settings: &Settings,
    global: &GlobalOptions,
) -> Executor<'a> {
    let executor = Executor::new(registry).with_dry_run(global.dry_run);
    match settings.conflict_policy {
        ConflictPolicy::Ask => executor.with_prompter(StdinPrompter),
        ConflictPolicy::Replace => executor.with_prompter(AlwaysReplace),
        ConflictPolicy::Keep => executor.with_prompter(AlwaysKeep),
    }
}

/// Asks on stderr and reads the answer from stdin.
///
/// Anything but `y`/`yes`, including end of input, keeps the existing
/// content.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&mut self, conflict: &Conflict) -> Decision {
        eprint!("{conflict} [y/N] ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                eprintln!();
                Decision::Keep
            }
            Ok(_) => parse_answer(&line),
        }
    }
}

/// Print the outcome of one applied queue.
pub fn report_result(result: &ExecutionResult, global: &GlobalOptions) {
    if global.quiet {
        return;
    }

    if result.dry_run {
        eprintln!(
            "[DRY RUN] {}: would apply {} operation(s)",
            result.description,
            result.applied.len()
        );
    } else if result.is_noop() && result.skipped.is_empty() {
        if global.verbose {
            eprintln!("{}: nothing to do", result.description);
        }
    } else {
        eprintln!(
            "{}: applied {} operation(s), kept {} divergent location(s)",
            result.description,
            result.applied.len(),
            result.skipped.len()
        );
    }

    if global.verbose {
        for skipped in &result.skipped {
            eprintln!("  - skipped: {skipped}");
        }
    }
}
