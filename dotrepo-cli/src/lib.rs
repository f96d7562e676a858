//! Library exports for dotrepo-cli.
//!
//! This module exports the CLI structure so documentation tooling can
//! render it without running the binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
