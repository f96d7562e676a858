#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # dotrepo
//!
//! A library for keeping tracked dotfiles converged between a home
//! directory and a categorized store.
//!
//! Every tracked path has an ordered list of categories. The first category
//! holding real content is the master; every other category location, and
//! home, becomes a symlink to it.
//!
//! ## Core Types
//!
//! - [`TrackedPath`] and [`Filelist`]: what is tracked and under which
//!   categories
//! - [`StoragePlugin`] and [`PluginRegistry`]: where store copies live and
//!   how they are encoded
//! - [`Planner`], [`OperationQueue`] and [`Executor`]: plan, inspect, and
//!   apply convergence
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use dotrepo::{AlwaysReplace, Executor, Filelist, Planner, PluginRegistry};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let home = dir.path().join("home");
//! std::fs::create_dir_all(&home).unwrap();
//! std::fs::write(home.join(".bashrc"), "alias ll='ls -l'").unwrap();
//!
//! let filelist: Filelist = ".bashrc:common,laptop".parse().unwrap();
//! let registry = PluginRegistry::plain(dir.path().join("repo/dotfiles"), &home).unwrap();
//! let planner = Planner::new(&registry);
//! let mut executor = Executor::new(&registry).with_prompter(AlwaysReplace);
//!
//! let queue = planner.plan_update(filelist.entries()).unwrap();
//! assert_eq!(queue.len(), 2);
//! queue.apply(&mut executor).unwrap();
//!
//! assert!(dir.path().join("repo/dotfiles/plain/common/.bashrc").is_file());
//! assert!(planner.plan_update(filelist.entries()).unwrap().is_empty());
//! ```

pub mod config;
pub mod error;
pub mod filelist;
pub mod location;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod plugin;
pub mod tracked;

// Re-export key types at crate root for convenience
pub use config::{ConfigBuilder, ConflictPolicy, Settings};
pub use error::{Error, Result};
pub use filelist::Filelist;
pub use location::{classify, Location, LocationKind, LocationState};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    AlwaysKeep, AlwaysReplace, Conflict, Decision, ExecutionResult, Executor, Operation,
    OperationQueue, Planner, Prompter, Report, RestoreMode,
};
pub use plugin::{PlainPlugin, PluginRegistry, StoragePlugin};
pub use tracked::TrackedPath;
