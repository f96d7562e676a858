//! Restore command implementation.
//!
//! This module implements the `restore` command, which points home at the
//! master of every active tracked path. Paths with no master in the store
//! are skipped with a warning.

use crate::error::CliError;
use crate::utils::{
    build_executor, load_filelist, load_registry, load_settings, report_result, GlobalOptions,
};
use clap::Args;
use dotrepo::{Planner, RestoreMode};

/// Link (or copy) home to the store.
#[derive(Args)]
pub struct RestoreCommand {
    /// Write real copies at home instead of links
    #[arg(long)]
    pub hard: bool,
}

impl RestoreCommand {
    /// Execute the restore command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global)?;
        let registry = load_registry(&settings)?;
        let filelist = load_filelist(&settings)?;

        let mode = if self.hard {
            RestoreMode::Copy
        } else {
            RestoreMode::Link
        };
        let queue = Planner::new(&registry).plan_restore_with(&filelist, mode)?;

        let mut executor = build_executor(&registry, &settings, global);
        let result = queue.apply(&mut executor)?;
        report_result(&result, global);

        Ok(())
    }
}
