//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the filelist and store directory
//! - `update`: Pull home content into the store and converge categories
//! - `restore`: Link or copy home from the store
//! - `clean`: Remove managed entries from home
//! - `diff`: Show pending changes
//! - `list`: List tracked paths
//! - `completions`: Generate shell completion scripts

pub mod clean;
pub mod completions;
pub mod diff;
pub mod init;
pub mod list;
pub mod restore;
pub mod update;

pub use clean::CleanCommand;
pub use completions::CompletionsCommand;
pub use diff::DiffCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use restore::RestoreCommand;
pub use update::UpdateCommand;
