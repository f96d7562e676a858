//! Filelist parsing and serialization.
//!
//! The filelist is a line-oriented text file naming every tracked path:
//!
//! ```text
//! # comments and blank lines are ignored
//! laptops=laptop,netbook
//! .vimrc
//! .gitconfig:work,common
//! .ssh/config:laptops|plain
//! ```
//!
//! A path without categories lives under [`DEFAULT_CATEGORY`]; `name=a,b`
//! defines a category group expanded wherever `name` appears in a category
//! list; `|plugin` routes a path through a storage plugin.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tracked::{validate_category, TrackedPath, DEFAULT_PLUGIN};

/// Category of paths listed without one.
pub const DEFAULT_CATEGORY: &str = "common";

/// Parsed filelist: category groups plus tracked paths in file order.
///
/// # Examples
///
/// ```
/// use dotrepo::Filelist;
///
/// let filelist: Filelist = "g=laptop,desktop\n.vimrc\n.bashrc:g|plain\n".parse().unwrap();
/// assert_eq!(filelist.len(), 2);
/// assert_eq!(filelist.entries()[0].categories(), ["common"]);
/// assert_eq!(filelist.entries()[1].categories(), ["laptop", "desktop"]);
///
/// let active = filelist.activate(&["desktop".to_string()]);
/// assert_eq!(active.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filelist {
    groups: BTreeMap<String, Vec<String>>,
    entries: Vec<TrackedPath>,
}

impl Filelist {
    /// Parses filelist text, routing paths without `|plugin` through the
    /// plain plugin.
    ///
    /// # Errors
    ///
    /// Returns `Filelist` with the offending line number for malformed
    /// lines, invalid names, duplicate paths or groups, and groups listing
    /// other groups.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_plugin(text, DEFAULT_PLUGIN)
    }

    /// Parses filelist text with a custom default plugin.
    ///
    /// # Errors
    ///
    /// See [`Filelist::parse`].
    pub fn parse_with_plugin(text: &str, default_plugin: &str) -> Result<Self> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .collect();

        // Groups may be used before they are defined.
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut defined: Vec<(usize, String)> = Vec::new();
        for &(number, line) in &lines {
            let Some((name, members)) = line.split_once('=') else {
                continue;
            };
            let name = name.trim();
            validate_category(name).map_err(|e| error(number, e.to_string()))?;
            let members = split_categories(members, number)?;
            if groups.insert(name.to_string(), members).is_some() {
                return Err(error(number, format!("group '{name}' defined twice")));
            }
            defined.push((number, name.to_string()));
        }

        // Expansion is one level deep.
        for (number, name) in &defined {
            if let Some(nested) = groups[name].iter().find(|m| groups.contains_key(*m)) {
                return Err(error(
                    *number,
                    format!("group '{name}' cannot contain group '{nested}'"),
                ));
            }
        }

        let mut entries: Vec<TrackedPath> = Vec::new();
        for &(number, line) in &lines {
            if line.contains('=') {
                continue;
            }
            let (spec, plugin) = match line.split_once('|') {
                Some((spec, plugin)) => (spec.trim(), plugin.trim()),
                None => (line, default_plugin),
            };
            let (path, categories) = match spec.split_once(':') {
                Some((path, categories)) => (path.trim(), split_categories(categories, number)?),
                None => (spec, vec![DEFAULT_CATEGORY.to_string()]),
            };

            let mut expanded: Vec<String> = Vec::new();
            for category in categories {
                let members = groups.get(&category).cloned().unwrap_or_else(|| vec![category]);
                for member in members {
                    if !expanded.contains(&member) {
                        expanded.push(member);
                    }
                }
            }

            let tracked = TrackedPath::with_plugin(path, expanded, plugin)
                .map_err(|e| error(number, e.to_string()))?;
            if entries.iter().any(|e| e.path() == tracked.path()) {
                return Err(error(number, format!("\"{path}\" is listed twice")));
            }
            entries.push(tracked);
        }

        Ok(Self { groups, entries })
    }

    /// Reads and parses the filelist at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise see
    /// [`Filelist::parse_with_plugin`].
    pub fn load(path: &Path, default_plugin: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse_with_plugin(&text, default_plugin)
    }

    /// Tracked paths in file order.
    #[must_use]
    pub fn entries(&self) -> &[TrackedPath] {
        &self.entries
    }

    /// Category groups by name.
    #[must_use]
    pub const fn groups(&self) -> &BTreeMap<String, Vec<String>> {
        &self.groups
    }

    /// Number of tracked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no paths are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that share at least one category with `active`.
    ///
    /// Each kept entry retains its full category list, so every store
    /// location of an active path still converges.
    #[must_use]
    pub fn activate(&self, active: &[String]) -> Vec<TrackedPath> {
        self.entries
            .iter()
            .filter(|tracked| tracked.categories().iter().any(|c| active.contains(c)))
            .cloned()
            .collect()
    }
}

impl FromStr for Filelist {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Filelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, members) in &self.groups {
            writeln!(f, "{name}={}", members.join(","))?;
        }
        for tracked in &self.entries {
            write!(f, "{}", tracked.path().display())?;
            if tracked.categories() != [DEFAULT_CATEGORY] {
                write!(f, ":{}", tracked.categories().join(","))?;
            }
            if tracked.plugin() != DEFAULT_PLUGIN {
                write!(f, "|{}", tracked.plugin())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn error(line: usize, message: String) -> Error {
    Error::Filelist { line, message }
}

fn split_categories(list: &str, line: usize) -> Result<Vec<String>> {
    let categories: Vec<String> = list.split(',').map(|c| c.trim().to_string()).collect();
    for category in &categories {
        validate_category(category).map_err(|e| error(line, e.to_string()))?;
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let filelist = Filelist::parse("# header\n\nfile\nfile2:cat1,cat2\n").unwrap();
        assert_eq!(filelist.len(), 2);
        assert_eq!(filelist.entries()[0].categories(), ["common"]);
        assert_eq!(filelist.entries()[1].categories(), ["cat1", "cat2"]);
        assert_eq!(filelist.entries()[1].plugin(), "plain");
    }

    #[test]
    fn test_plugin_suffix() {
        let filelist = Filelist::parse("file:cat1,cat2|encrypt\nfile2|encrypt").unwrap();
        assert_eq!(filelist.entries()[0].plugin(), "encrypt");
        assert_eq!(filelist.entries()[1].categories(), ["common"]);
        assert_eq!(filelist.entries()[1].plugin(), "encrypt");
    }

    #[test]
    fn test_groups_expand_in_place() {
        let filelist = Filelist::parse("file:work,machines,common\nmachines=laptop,desktop").unwrap();
        assert_eq!(
            filelist.entries()[0].categories(),
            ["work", "laptop", "desktop", "common"]
        );
        assert_eq!(filelist.groups().len(), 1);
    }

    #[test]
    fn test_group_expansion_deduplicates() {
        let filelist = Filelist::parse("g=a,b\nfile:a,g").unwrap();
        assert_eq!(filelist.entries()[0].categories(), ["a", "b"]);
    }

    #[test]
    fn test_nested_group_is_rejected() {
        let err = Filelist::parse("g=h\nh=a\nx:g").unwrap_err();
        match err {
            Error::Filelist { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("cannot contain group 'h'"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(Filelist::parse("g=a,g\nx:g").is_err());
    }

    #[test]
    fn test_display_parses_back_with_groups() {
        let filelist = Filelist::parse("g=a,b\nh=c\nx:g,h\ny:a\n").unwrap();
        let reparsed = Filelist::parse(&filelist.to_string()).unwrap();
        assert_eq!(reparsed, filelist);
        assert_eq!(reparsed.entries()[0].categories(), ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_path_reports_line() {
        let err = Filelist::parse("file\n# c\nfile:other").unwrap_err();
        match err {
            Error::Filelist { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("listed twice"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_lines() {
        assert!(Filelist::parse("/etc/hosts").is_err());
        assert!(Filelist::parse("file:").is_err());
        assert!(Filelist::parse("file:a,,b").is_err());
        assert!(Filelist::parse("file:a/b").is_err());
        assert!(Filelist::parse("file|").is_err());
        assert!(Filelist::parse("g=a\ng=b").is_err());
    }

    #[test]
    fn test_activate_keeps_all_categories() {
        let filelist = Filelist::parse("a:laptop,common\nb:work\nc").unwrap();
        let active = filelist.activate(&["laptop".to_string()]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].categories(), ["laptop", "common"]);

        let active = filelist.activate(&["common".to_string(), "work".to_string()]);
        assert_eq!(active.len(), 3);
    }

    #[test]
    fn test_display_omits_defaults() {
        let text = "file\nfile2:cat1,cat2|encrypt\n";
        assert_eq!(Filelist::parse(text).unwrap().to_string(), text);
    }
}
