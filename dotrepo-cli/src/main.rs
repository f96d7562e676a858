//! Main entry point for the dotrepo CLI.
//!
//! This is the command-line interface for the dotrepo dotfile manager.
//! It provides commands for keeping a home directory and a categorized
//! store in agreement:
//! - `init`: Prepare a repository
//! - `update`: Pull home content into the store and link everything up
//! - `restore`: Link or copy home from the store
//! - `clean`: Remove managed entries from home
//! - `diff`: Show pending changes

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = dotrepo::init_logger(cli.verbose, cli.quiet);

    let global = cli.global_options();

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Update(cmd) => cmd.execute(&global),
        cli::Command::Restore(cmd) => cmd.execute(&global),
        cli::Command::Clean(cmd) => cmd.execute(&global),
        cli::Command::Diff(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            for line in e.progress_report() {
                eprintln!("{line}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
