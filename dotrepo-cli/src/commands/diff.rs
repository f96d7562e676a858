//! Diff command implementation.
//!
//! This module implements the `diff` command, which shows what `update`
//! would do without doing it, plus home copies that drifted from the store.

use crate::error::CliError;
use crate::utils::{load_filelist, load_registry, load_settings, GlobalOptions};
use clap::{Args, ValueEnum};
use dotrepo::Report;
use std::io::Write;

/// Show pending changes without applying them.
#[derive(Args)]
pub struct DiffCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text", ignore_case = true)]
    pub format: OutputFormat,
}

/// Output format for diff command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per pending change
    Text,
    /// JSON object with pending, modified and warnings
    Json,
}

impl DiffCommand {
    /// Execute the diff command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global)?;
        let registry = load_registry(&settings)?;
        let filelist = load_filelist(&settings)?;

        let report = Report::collect(&registry, &filelist)?;

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Text => {
                write!(handle, "{report}")?;
                if report.is_empty() && !global.quiet {
                    eprintln!("Everything is up to date");
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, &report)
                    .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
                writeln!(handle)?;
            }
        }

        Ok(())
    }
}
