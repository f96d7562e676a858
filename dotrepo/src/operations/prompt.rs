//! Conflict confirmation as an injected capability.
//!
//! The executor never reads from the console itself. Whoever builds it
//! supplies a [`Prompter`]: an interactive front-end, a fixed policy such
//! as [`AlwaysKeep`], or any `FnMut(&Conflict) -> Decision` closure.

use std::fmt;
use std::path::PathBuf;

use crate::location::LocationState;

use super::queue::Materialize;

/// A location holding content the master should own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The conflicting location.
    pub at: PathBuf,
    /// What was found there at planning time.
    pub existing: LocationState,
    /// What would take its place.
    pub replacement: PathBuf,
    /// How the replacement fills the location.
    pub materialize: Materialize,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with = match self.materialize {
            Materialize::Link => "a link to",
            Materialize::Copy(_) => "a copy of",
            Materialize::Encode(_) => {
                return write!(
                    f,
                    "\"{}\" was edited; store it in the repository at \"{}\"?",
                    self.replacement.display(),
                    self.at.display()
                );
            }
        };
        write!(
            f,
            "\"{}\" is a {} that differs from the repository; replace it with {with} \"{}\"?",
            self.at.display(),
            self.existing,
            self.replacement.display()
        )
    }
}

/// Answer to a [`Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Discard the existing content and materialize the replacement.
    Replace,
    /// Leave the existing content untouched.
    Keep,
}

/// Decides conflicts on behalf of the user.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Returns the decision for one conflict. Called once per conflict.
    fn confirm(&mut self, conflict: &Conflict) -> Decision;
}

impl<F> Prompter for F
where
    F: FnMut(&Conflict) -> Decision,
{
    fn confirm(&mut self, conflict: &Conflict) -> Decision {
        self(conflict)
    }
}

/// Non-interactive policy that accepts every replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReplace;

impl Prompter for AlwaysReplace {
    fn confirm(&mut self, _conflict: &Conflict) -> Decision {
        Decision::Replace
    }
}

/// Non-interactive policy that declines every replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysKeep;

impl Prompter for AlwaysKeep {
    fn confirm(&mut self, _conflict: &Conflict) -> Decision {
        Decision::Keep
    }
}

/// Interprets one line of user input. Only `y`/`yes` replace.
///
/// # Examples
///
/// ```
/// use dotrepo::operations::{parse_answer, Decision};
///
/// assert_eq!(parse_answer("y\n"), Decision::Replace);
/// assert_eq!(parse_answer(" YES "), Decision::Replace);
/// assert_eq!(parse_answer("n"), Decision::Keep);
/// assert_eq!(parse_answer("0"), Decision::Keep);
/// assert_eq!(parse_answer(""), Decision::Keep);
/// ```
#[must_use]
pub fn parse_answer(line: &str) -> Decision {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Decision::Replace,
        _ => Decision::Keep,
    }
}
