//! Configuration system for dotrepo.
//!
//! This module provides layered configuration with support for:
//! - YAML configuration files (user config and repository config)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of every layer and of the resolved result
//!
//! # Configuration Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`), which is
//!    where command-line flags land
//! 2. Environment variables (`DOTREPO_*`)
//! 3. Repository config (`<repo>/dotrepo.yaml`)
//! 4. User config (`~/.config/dotrepo/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use dotrepo::config::ConfigBuilder;
//!
//! let settings = ConfigBuilder::new("/home/me/dots").build().unwrap();
//! println!("store: {}", settings.store_dir.display());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::{parse_policy, EnvironmentConfig};
pub use loader::{ConfigLoader, ConfigSource, REPO_CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::{Config, ConflictPolicy, Settings};
pub use validator::ConfigValidator;
