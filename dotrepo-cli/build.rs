//! Build script for dotrepo-cli.
//!
//! This script generates a man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    let hard = |help: &'static str| Arg::new("hard").long("hard").help(help).action(ArgAction::SetTrue);

    Command::new("dotrepo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep tracked dotfiles converged between home and a categorized store")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("repo")
                .long("repo")
                .help("Repository root (defaults to the current directory)")
                .value_name("PATH")
                .global(true)
                .env("DOTREPO_REPO"),
        )
        .arg(
            Arg::new("home")
                .long("home")
                .help("Override the home directory")
                .value_name("PATH")
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Show what would change without changing anything")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .short('c')
                .help("Active category (repeatable, overrides configuration)")
                .value_name("NAME")
                .global(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("yes")
                .long("yes")
                .short('y')
                .help("Replace divergent content without asking")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no")
                .long("no")
                .help("Keep divergent content without asking")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("init").about("Create the filelist and store directory in a repository"),
            Command::new("update")
                .about("Move home content into the store, converge categories, then link home")
                .arg(hard("Leave real copies at home instead of links")),
            Command::new("restore")
                .about("Link (or copy) home to the store")
                .arg(hard("Write real copies at home instead of links")),
            Command::new("clean")
                .about("Remove managed entries from home")
                .arg(hard("Also remove regular files at tracked home paths")),
            Command::new("diff").about("Show pending changes without applying them"),
            Command::new("list").about("List tracked paths"),
            Command::new("completions").about("Generate shell completion scripts"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").map_err(std::io::Error::other)?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("dotrepo.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
