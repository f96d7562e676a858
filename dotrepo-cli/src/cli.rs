//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CleanCommand, CompletionsCommand, DiffCommand, InitCommand, ListCommand, RestoreCommand,
    UpdateCommand,
};
use crate::utils::GlobalOptions;
use clap::{Parser, Subcommand};
use dotrepo::ConflictPolicy;
use std::path::PathBuf;

/// Keep tracked dotfiles converged between home and a categorized store.
#[derive(Parser)]
#[command(name = "dotrepo")]
#[command(
    version,
    about = "Keep tracked dotfiles converged between home and a categorized store",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Repository root (defaults to the current directory)
    #[arg(long, value_name = "PATH", global = true, env = "DOTREPO_REPO")]
    pub repo: Option<PathBuf>,

    /// Override the home directory
    #[arg(long, value_name = "PATH", global = true)]
    pub home: Option<PathBuf>,

    /// Show what would change without changing anything
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    /// Active category (repeatable, overrides configuration)
    #[arg(long = "category", short = 'c', value_name = "NAME", global = true)]
    pub categories: Vec<String>,

    /// Replace divergent content without asking
    #[arg(long, short = 'y', global = true, conflicts_with = "no")]
    pub yes: bool,

    /// Keep divergent content without asking
    #[arg(long, global = true)]
    pub no: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Options shared by every subcommand.
    pub fn global_options(&self) -> GlobalOptions {
        let policy = if self.yes {
            Some(ConflictPolicy::Replace)
        } else if self.no {
            Some(ConflictPolicy::Keep)
        } else {
            None
        };

        GlobalOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            repo: self.repo.clone(),
            home: self.home.clone(),
            dry_run: self.dry_run,
            categories: self.categories.clone(),
            policy,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the filelist and store directory in a repository
    Init(InitCommand),

    /// Move home content into the store, converge categories, then link home
    Update(UpdateCommand),

    /// Link (or copy) home to the store
    Restore(RestoreCommand),

    /// Remove managed entries from home
    Clean(CleanCommand),

    /// Show pending changes without applying them
    Diff(DiffCommand),

    /// List tracked paths
    List(ListCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
