//! Update command implementation.
//!
//! This module implements the `update` command. It runs in two stages:
//! first home content is moved into the store and every category location
//! converges on its master, then home is linked to the master. With
//! `--hard`, home holds copies, and an edited copy is offered to the store
//! before home is restored.

use crate::error::CliError;
use crate::utils::{
    build_executor, load_filelist, load_registry, load_settings, report_result, GlobalOptions,
};
use clap::Args;
use dotrepo::{Planner, RestoreMode};

/// Move home content into the store, converge categories, then link home.
#[derive(Args)]
pub struct UpdateCommand {
    /// Leave real copies at home instead of links
    #[arg(long)]
    pub hard: bool,
}

impl UpdateCommand {
    /// Execute the update command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global)?;
        let registry = load_registry(&settings)?;
        let filelist = load_filelist(&settings)?;

        let mode = if self.hard {
            RestoreMode::Copy
        } else {
            RestoreMode::Link
        };
        let planner = Planner::new(&registry);
        let mut executor = build_executor(&registry, &settings, global);

        let result = planner
            .plan_update_with(&filelist, mode)?
            .apply(&mut executor)?;
        report_result(&result, global);

        // Planned only now so it sees the masters the first stage created
        let result = planner
            .plan_restore_with(&filelist, mode)?
            .apply(&mut executor)?;
        report_result(&result, global);

        Ok(())
    }
}
