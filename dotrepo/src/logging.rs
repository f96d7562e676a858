//! Logging infrastructure for the dotrepo library.
//!
//! The library itself only talks to the `log` facade. This module provides
//! the stderr backend used by the CLI, with three verbosity levels.

use std::env;
use std::fmt;

use log::{LevelFilter, Metadata, Record};

/// Environment variable consulted when no verbosity flag is given.
pub const LOG_MODE_ENV: &str = "DOTREPO_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use dotrepo::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Errors, warnings, and what was changed on disk.
    Normal,
    /// Everything, including planning decisions.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotrepo::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("quiet").unwrap(), LogLevel::Quiet);
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("chatty").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// The `log` crate filter matching this level.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// A stderr logger usable directly or as the global `log` backend.
///
/// # Examples
///
/// ```
/// use dotrepo::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.warn("keeping divergent \".vimrc\"");
/// logger.debug("not printed at Normal");
/// ```
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs an error message. Printed at every level.
    pub fn error(&self, message: &str) {
        eprintln!("ERROR: {message}");
    }

    /// Logs a warning message unless the level is Quiet.
    pub fn warn(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("WARN: {message}");
        }
    }

    /// Logs an informational message unless the level is Quiet.
    pub fn info(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("INFO: {message}");
        }
    }

    /// Logs a debug message at Verbose level only.
    pub fn debug(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("DEBUG: {message}");
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        match record.level() {
            log::Level::Error => self.error(&message),
            log::Level::Warn => self.warn(&message),
            log::Level::Info => self.info(&message),
            log::Level::Debug | log::Level::Trace => self.debug(&message),
        }
    }

    fn flush(&self) {}
}

/// Resolves the effective level from CLI flags and the environment.
///
/// The priority order is:
/// 1. CLI flags (verbose wins over quiet)
/// 2. `DOTREPO_LOG_MODE` environment variable
/// 3. Default (Normal)
#[must_use]
pub fn resolve_level(verbose: bool, quiet: bool) -> LogLevel {
    if verbose {
        return LogLevel::Verbose;
    }
    if quiet {
        return LogLevel::Quiet;
    }

    if let Ok(env_value) = env::var(LOG_MODE_ENV) {
        if let Ok(level) = LogLevel::parse(&env_value) {
            return level;
        }
    }

    LogLevel::Normal
}

/// Installs a [`Logger`] as the global `log` backend.
///
/// Installing twice is harmless: the first logger stays in place and the
/// resolved level is still returned.
///
/// # Examples
///
/// ```
/// use dotrepo::{init_logger, LogLevel};
///
/// let level = init_logger(true, false);
/// assert_eq!(level, LogLevel::Verbose);
/// ```
pub fn init_logger(verbose: bool, quiet: bool) -> LogLevel {
    let level = resolve_level(verbose, quiet);
    if log::set_boxed_logger(Box::new(Logger::new(level))).is_ok() {
        log::set_max_level(level.filter());
    }
    level
}
