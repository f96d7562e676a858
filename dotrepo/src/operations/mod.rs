//! Reconciliation using the plan-apply pattern.
//!
//! Operations are split into two phases:
//! 1. **Planning**: [`Planner`] inspects home and store and builds an
//!    [`OperationQueue`] without touching anything
//! 2. **Execution**: [`Executor`] applies the queue in order, asking its
//!    [`Prompter`] before discarding divergent content
//!
//! # Examples
//!
//! ```
//! use dotrepo::operations::{AlwaysKeep, Executor, Planner};
//! use dotrepo::plugin::PluginRegistry;
//! use dotrepo::TrackedPath;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let home = dir.path().join("home");
//! std::fs::create_dir_all(&home).unwrap();
//! std::fs::write(home.join(".vimrc"), "set nu").unwrap();
//!
//! let registry = PluginRegistry::plain(dir.path().join("dotfiles"), &home).unwrap();
//! let filelist = vec![TrackedPath::new(".vimrc", ["common", "laptop"]).unwrap()];
//!
//! let planner = Planner::new(&registry);
//! let mut executor = Executor::new(&registry).with_prompter(AlwaysKeep);
//!
//! planner.plan_update(&filelist).unwrap().apply(&mut executor).unwrap();
//! planner.plan_restore(&filelist).unwrap().apply(&mut executor).unwrap();
//!
//! // Converged: nothing left to do
//! assert!(planner.plan_update(&filelist).unwrap().is_empty());
//! assert!(planner.plan_restore(&filelist).unwrap().is_empty());
//! assert_eq!(std::fs::read_to_string(home.join(".vimrc")).unwrap(), "set nu");
//! ```

pub mod executor;
pub mod planner;
pub mod prompt;
pub mod queue;
pub mod report;

pub use executor::{ExecutionResult, Executor};
pub use planner::{Planner, RestoreMode};
pub use prompt::{parse_answer, AlwaysKeep, AlwaysReplace, Conflict, Decision, Prompter};
pub use queue::{Materialize, Operation, OperationQueue};
pub use report::Report;
