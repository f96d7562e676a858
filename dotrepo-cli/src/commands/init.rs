//! Init command implementation.
//!
//! This module implements the `init` command, which prepares a repository
//! by creating an empty filelist and the store directory.

use crate::error::CliError;
use crate::utils::{load_settings, GlobalOptions};
use clap::Args;
use std::fs;

/// Written to a freshly created filelist.
const FILELIST_TEMPLATE: &str = "\
# Tracked paths, one per line, relative to home.
#
#   .vimrc                    tracked under the default category
#   .gitconfig:common,work    ordered categories; the first holds the content
#   .ssh/config|plain         explicit storage plugin
#   machines=laptop,desktop   a group usable in category lists
";

/// Create the filelist and store directory in a repository.
#[derive(Args)]
pub struct InitCommand {}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Existing files are reported and left alone, so running init twice is
    /// harmless.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Fails with "safety checks failed" when the repo is the home directory
        let settings = load_settings(global)?;
        let filelist_exists = settings.filelist.exists();
        let store_exists = settings.store_dir.is_dir();

        if global.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize dotrepo in: {}", settings.repo.display());
            if filelist_exists {
                println!("  - Filelist already exists: {}", settings.filelist.display());
            } else {
                println!("  - Create filelist: {}", settings.filelist.display());
            }
            if store_exists {
                println!("  - Store already exists: {}", settings.store_dir.display());
            } else {
                println!("  - Create store: {}", settings.store_dir.display());
            }
            return Ok(());
        }

        if !filelist_exists {
            if let Some(parent) = settings.filelist.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&settings.filelist, FILELIST_TEMPLATE)?;
        }
        if !store_exists {
            fs::create_dir_all(&settings.store_dir)?;
        }

        println!("Initialized dotrepo in: {}", settings.repo.display());
        if filelist_exists {
            println!("  - Filelist already exists (not overwritten)");
        } else {
            println!("  - Created filelist");
        }
        if store_exists {
            println!("  - Store already exists");
        } else {
            println!("  - Created store");
        }

        Ok(())
    }
}
