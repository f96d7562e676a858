//! Pending-change report.
//!
//! A report lists what `update` followed by `restore` would do, without
//! doing it, plus home copies whose content has drifted from the master.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::location::{classify, LocationState};
use crate::plugin::PluginRegistry;
use crate::tracked::TrackedPath;

use super::planner::{home_and_master, Planner};
use super::queue::Operation;

/// Changes not yet applied, in the order they were found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Operation descriptions of the pending update and restore.
    pub pending: Vec<String>,

    /// Home copies whose content differs from the decoded master.
    pub modified: Vec<PathBuf>,

    /// Planning warnings.
    pub warnings: Vec<String>,
}

impl Report {
    /// Plans update and restore for `filelist` and collects the result.
    ///
    /// # Errors
    ///
    /// Propagates planning errors, and `ContractViolation` when a master
    /// cannot be decoded.
    pub fn collect(registry: &PluginRegistry, filelist: &[TrackedPath]) -> Result<Self> {
        let planner = Planner::new(registry);
        let update = planner.plan_update(filelist)?;
        let restore = planner.plan_restore(filelist)?;

        let mut report = Self::default();
        report.pending.extend(update.descriptions());
        // A real file at home is reported by content, not as a link prompt.
        report.pending.extend(
            restore
                .ops()
                .iter()
                .filter(|op| {
                    !matches!(
                        op,
                        Operation::PromptReplace {
                            existing: LocationState::RegularFile,
                            ..
                        }
                    )
                })
                .map(Operation::description),
        );
        // Restore skips paths update is about to create, so only update
        // warnings are meaningful here.
        report.warnings.extend(update.warnings().iter().cloned());

        for tracked in filelist {
            let (home, Some(master)) = home_and_master(registry, tracked)? else {
                continue;
            };
            if classify(&home, None)? != LocationState::RegularFile {
                continue;
            }
            let plugin = registry.get(tracked.plugin())?;
            let decoded = plugin
                .decode(&fs::read(&master)?)
                .map_err(|e| Error::ContractViolation {
                    plugin: plugin.name().to_string(),
                    details: format!("cannot decode {}: {e}", master.display()),
                })?;
            if decoded != fs::read(&home)? {
                report.modified.push(home);
            }
        }

        Ok(report)
    }

    /// Whether there is nothing to report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.modified.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.pending {
            writeln!(f, "{line}")?;
        }
        if !self.modified.is_empty() {
            if !self.pending.is_empty() {
                writeln!(f)?;
            }
            writeln!(f, "home changes not yet in repo:")?;
            for path in &self.modified {
                writeln!(f, "modified {}", path.display())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{Executor, RestoreMode};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PluginRegistry, Vec<TrackedPath>) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        let registry =
            PluginRegistry::plain(dir.path().join("dotfiles"), dir.path().join("home")).unwrap();
        let filelist = vec![
            TrackedPath::new("file", ["common"]).unwrap(),
            TrackedPath::new("file2", ["common"]).unwrap(),
        ];
        (dir, registry, filelist)
    }

    fn home(dir: &Path, name: &str) -> PathBuf {
        dir.join("home").join(name)
    }

    #[test]
    fn test_report_lists_pending_operations() {
        let (dir, registry, filelist) = setup();
        fs::write(home(dir.path(), "file"), "hello").unwrap();

        let report = Report::collect(&registry, &filelist).unwrap();
        assert!(report.pending[0].starts_with("move"));
        assert!(report.pending[1].starts_with("create empty"));
        assert!(report.modified.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_report_detects_modified_copy() {
        let (dir, registry, filelist) = setup();
        fs::write(home(dir.path(), "file"), "").unwrap();
        fs::write(home(dir.path(), "file2"), "").unwrap();

        let planner = Planner::new(&registry);
        let mut executor = Executor::new(&registry);
        planner.plan_update(&filelist).unwrap().apply(&mut executor).unwrap();
        planner
            .plan_restore_with(&filelist, RestoreMode::Copy)
            .unwrap()
            .apply(&mut executor)
            .unwrap();

        assert!(Report::collect(&registry, &filelist).unwrap().is_empty());

        fs::write(home(dir.path(), "file"), "hello world").unwrap();
        let report = Report::collect(&registry, &filelist).unwrap();
        assert!(report.pending.is_empty());
        assert_eq!(report.modified, vec![home(dir.path(), "file")]);
        assert!(report
            .to_string()
            .ends_with(&format!("modified {}\n", home(dir.path(), "file").display())));
    }
}
