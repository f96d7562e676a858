//! List command implementation.
//!
//! This module implements the `list` command, which displays the tracked
//! paths of the filelist in table or JSON form.

use crate::error::CliError;
use crate::utils::{load_settings, read_filelist, GlobalOptions};
use clap::{Args, ValueEnum};
use dotrepo::TrackedPath;
use std::io::Write;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 3] = ["path", "categories", "plugin"];

/// List tracked paths.
#[derive(Args)]
pub struct ListCommand {
    /// Include paths outside the active categories
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "DOTREPO_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let settings = load_settings(global)?;
        let filelist = read_filelist(&settings)?;

        let entries = if self.all {
            filelist.entries().to_vec()
        } else {
            filelist.activate(&settings.categories)
        };

        match self.format {
            OutputFormat::Table => format_as_table(&entries, global.quiet)?,
            OutputFormat::Json => format_as_json(&entries)?,
        }

        Ok(())
    }
}

/// Format tracked paths as a human-readable table.
fn format_as_table(entries: &[TrackedPath], quiet: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if !quiet {
        let header_line = COLUMN_HEADERS
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(handle, "{header_line}")?;
    }

    for tracked in entries {
        writeln!(
            handle,
            "{}\t{}\t{}",
            tracked.path().display(),
            tracked.categories().join(","),
            tracked.plugin(),
        )?;
    }

    Ok(())
}

/// Format tracked paths as JSON.
fn format_as_json(entries: &[TrackedPath]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = entries
        .iter()
        .map(|tracked| {
            serde_json::json!({
                "path": tracked.path().display().to_string(),
                "categories": tracked.categories(),
                "plugin": tracked.plugin(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    writeln!(handle)?;

    Ok(())
}
