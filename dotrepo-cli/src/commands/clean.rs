//! Clean command implementation.
//!
//! This module implements the `clean` command, which removes home entries
//! that point into the store. The store itself is never modified.

use crate::error::CliError;
use crate::utils::{
    build_executor, load_filelist, load_registry, load_settings, report_result, GlobalOptions,
};
use clap::Args;
use dotrepo::Planner;

/// Remove managed entries from home.
#[derive(Args)]
pub struct CleanCommand {
    /// Also remove regular files at tracked home paths
    #[arg(long)]
    pub hard: bool,
}

impl CleanCommand {
    /// Execute the clean command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global)?;
        let registry = load_registry(&settings)?;
        let filelist = load_filelist(&settings)?;

        if self.hard && !global.quiet {
            eprintln!("Removing regular files at home as well as links");
        }

        let queue = Planner::new(&registry).plan_clean(&filelist, self.hard)?;
        let mut executor = build_executor(&registry, &settings, global);
        let result = queue.apply(&mut executor)?;
        report_result(&result, global);

        Ok(())
    }
}
