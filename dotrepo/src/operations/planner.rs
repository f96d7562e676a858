//! Reconciliation planning.
//!
//! The planner inspects the home location and every category location of
//! each tracked path and builds the [`OperationQueue`] that converges them.
//! Planning only reads the filesystem; nothing is changed until the queue
//! is applied.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::location::{classify, Location, LocationKind, LocationState};
use crate::paths::{link_destination, relative_link_target, resolve_components};
use crate::plugin::{PluginRegistry, StoragePlugin};
use crate::tracked::TrackedPath;

use super::queue::{Materialize, Operation, OperationQueue};

/// How restore materializes home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreMode {
    /// Home becomes an absolute symlink to the master.
    #[default]
    Link,
    /// Home becomes a decoded copy of the master.
    Copy,
}

/// Locations of one tracked path, resolved through its plugin.
struct Resolved<'p> {
    plugin: &'p dyn StoragePlugin,
    home: Location,
    categories: Vec<Location>,
}

impl Resolved<'_> {
    fn paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.home.path()).chain(self.categories.iter().map(Location::path))
    }

    /// Index of the first category holding real content.
    fn find_master(&self) -> Result<Option<usize>> {
        for (index, location) in self.categories.iter().enumerate() {
            if classify(location.path(), None)?.is_regular_file() {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// First location holding a directory or special file, if any.
    fn unsupported(&self) -> Result<Option<&Path>> {
        for path in self.paths() {
            if classify(path, None)? == LocationState::Unsupported {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

/// Builds operation queues for update, restore and clean.
///
/// # Examples
///
/// ```
/// use dotrepo::operations::Planner;
/// use dotrepo::plugin::PluginRegistry;
/// use dotrepo::TrackedPath;
///
/// let dir = tempfile::tempdir().unwrap();
/// let registry = PluginRegistry::plain(dir.path().join("dotfiles"), dir.path().join("home")).unwrap();
/// let planner = Planner::new(&registry);
///
/// let filelist = vec![TrackedPath::new(".vimrc", ["common"]).unwrap()];
/// let queue = planner.plan_restore(&filelist).unwrap();
///
/// // Nothing in the store yet, so restore skips the path
/// assert!(queue.is_empty());
/// assert_eq!(queue.warnings().len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> Planner<'a> {
    /// Creates a planner resolving locations through `registry`.
    #[must_use]
    pub const fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Plans moving content from home into the store and converging every
    /// category location onto a single master.
    ///
    /// Home is only ever read here, or emptied when its content becomes the
    /// master; linking home back is a separate restore step.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlugin` for an unregistered plugin,
    /// `ContractViolation` when a plugin cannot resolve a location, and
    /// `Io` when a location cannot be inspected.
    pub fn plan_update(&self, filelist: &[TrackedPath]) -> Result<OperationQueue> {
        self.plan_update_with(filelist, RestoreMode::Link)
    }

    /// Plans update for a home that is restored in the given mode.
    ///
    /// A home kept as copies (copy mode, or a plugin that is not
    /// passthrough) is edited in place. When such a copy differs from the
    /// master, the plan asks to store it as the new master before anything
    /// restores home.
    ///
    /// # Errors
    ///
    /// See [`Planner::plan_update`].
    pub fn plan_update_with(
        &self,
        filelist: &[TrackedPath],
        mode: RestoreMode,
    ) -> Result<OperationQueue> {
        let description = match mode {
            RestoreMode::Link => "update",
            RestoreMode::Copy => "update (copy)",
        };
        let mut queue = OperationQueue::new(description);
        for tracked in filelist {
            self.update_one(tracked, mode, &mut queue)?;
        }
        Ok(queue)
    }

    /// Plans linking home to the master of each tracked path.
    ///
    /// # Errors
    ///
    /// See [`Planner::plan_update`].
    pub fn plan_restore(&self, filelist: &[TrackedPath]) -> Result<OperationQueue> {
        self.plan_restore_with(filelist, RestoreMode::Link)
    }

    /// Plans restoring home in the given mode.
    ///
    /// Paths routed through a plugin that is not passthrough are always
    /// restored as copies, since their stored bytes are not home content.
    ///
    /// # Errors
    ///
    /// See [`Planner::plan_update`].
    pub fn plan_restore_with(
        &self,
        filelist: &[TrackedPath],
        mode: RestoreMode,
    ) -> Result<OperationQueue> {
        let description = match mode {
            RestoreMode::Link => "restore",
            RestoreMode::Copy => "restore (copy)",
        };
        let mut queue = OperationQueue::new(description);
        for tracked in filelist {
            self.restore_one(tracked, mode, &mut queue)?;
        }
        Ok(queue)
    }

    /// Plans removing managed home entries.
    ///
    /// Symlinks into the store are always removed. Regular files are removed
    /// only when `hard` is set. Symlinks pointing anywhere else are never
    /// touched.
    ///
    /// # Errors
    ///
    /// See [`Planner::plan_update`].
    pub fn plan_clean(&self, filelist: &[TrackedPath], hard: bool) -> Result<OperationQueue> {
        let description = if hard { "clean (hard)" } else { "clean" };
        let mut queue = OperationQueue::new(description);
        for tracked in filelist {
            self.clean_one(tracked, hard, &mut queue)?;
        }
        Ok(queue)
    }

    fn resolve(&self, tracked: &TrackedPath) -> Result<Resolved<'a>> {
        let plugin = self.registry.get(tracked.plugin())?;
        let violation = |details: String| Error::ContractViolation {
            plugin: plugin.name().to_string(),
            details,
        };

        let home = plugin
            .resolve_home(tracked)
            .map_err(|e| violation(format!("cannot resolve home for \"{tracked}\": {e}")))?;
        if !home.is_home() {
            return Err(violation(format!(
                "home of \"{}\" resolved to {home}",
                tracked.path().display()
            )));
        }

        let mut categories = Vec::with_capacity(tracked.categories().len());
        for category in tracked.categories() {
            let location = plugin.resolve(tracked, category).map_err(|e| {
                violation(format!(
                    "cannot resolve \"{}\" in category '{category}': {e}",
                    tracked.path().display()
                ))
            })?;
            if location.kind() != &LocationKind::Category(category.clone()) {
                return Err(violation(format!(
                    "category '{category}' of \"{}\" resolved to {location}",
                    tracked.path().display()
                )));
            }
            categories.push(location);
        }

        Ok(Resolved {
            plugin,
            home,
            categories,
        })
    }

    /// Resolves `tracked`, or records a warning and returns `None` when a
    /// location holds something that is never managed.
    fn inspect(&self, tracked: &TrackedPath, queue: &mut OperationQueue) -> Result<Option<Resolved<'a>>> {
        let resolved = self.resolve(tracked)?;
        if let Some(path) = resolved.unsupported()? {
            let warning = format!(
                "\"{}\" is neither a file nor a symlink, skipping \"{}\"",
                path.display(),
                tracked.path().display()
            );
            log::warn!("{warning}");
            queue.add_warning(warning);
            return Ok(None);
        }
        Ok(Some(resolved))
    }

    fn update_one(
        &self,
        tracked: &TrackedPath,
        mode: RestoreMode,
        queue: &mut OperationQueue,
    ) -> Result<()> {
        let Some(resolved) = self.inspect(tracked, queue)? else {
            return Ok(());
        };
        let first = &resolved.categories[0];
        let first_state = classify(first.path(), None)?;

        // The category whose content moves into the first one, if any.
        let mut migrated: Option<usize> = None;
        let mut master_pending = true;
        let found = resolved.find_master()?;
        match found {
            Some(0) => master_pending = false,
            Some(index) => {
                log::debug!(
                    "migrating master of \"{}\" from category '{}'",
                    tracked.path().display(),
                    tracked.categories()[index]
                );
                if first_state.exists() {
                    queue.enqueue(Operation::RemoveEntry {
                        at: first.path().to_path_buf(),
                    });
                }
                queue.enqueue(Operation::MoveContent {
                    from: resolved.categories[index].path().to_path_buf(),
                    to: first.path().to_path_buf(),
                    encode_with: None,
                });
                migrated = Some(index);
            }
            None if classify(resolved.home.path(), None)?.is_regular_file() => {
                if first_state.exists() {
                    queue.enqueue(Operation::RemoveEntry {
                        at: first.path().to_path_buf(),
                    });
                }
                queue.enqueue(Operation::MoveContent {
                    from: resolved.home.path().to_path_buf(),
                    to: first.path().to_path_buf(),
                    encode_with: Some(resolved.plugin.name().to_string()),
                });
            }
            None => {
                let warning = format!(
                    "unable to find any candidates for \"{}\", creating empty master",
                    tracked.path().display()
                );
                log::warn!("{warning}");
                queue.add_warning(warning);
                if first_state.exists() {
                    queue.enqueue(Operation::RemoveEntry {
                        at: first.path().to_path_buf(),
                    });
                }
                queue.enqueue(Operation::CreateEmpty {
                    at: first.path().to_path_buf(),
                    plugin: resolved.plugin.name().to_string(),
                });
            }
        }

        let copies_home = mode == RestoreMode::Copy || !resolved.plugin.is_passthrough();
        if let (true, Some(index)) = (copies_home, found) {
            let home = resolved.home.path();
            // A differing home copy holds edits the store has not seen.
            if classify(home, None)?.is_regular_file()
                && !same_content(resolved.plugin, resolved.categories[index].path(), home)?
            {
                queue.enqueue(Operation::PromptReplace {
                    existing: LocationState::RegularFile,
                    replacement: home.to_path_buf(),
                    at: first.path().to_path_buf(),
                    materialize: Materialize::Encode(resolved.plugin.name().to_string()),
                });
            }
        }

        // A master that is about to be created cannot be resolved yet, so
        // every existing link is treated as pointing elsewhere.
        let master = first.path();
        let classify_against = if master_pending { None } else { Some(master) };

        for (index, slave) in resolved.categories.iter().enumerate().skip(1) {
            let target = relative_link_target(master, slave.path());
            let link = Operation::CreateSymlink {
                target: target.clone(),
                at: slave.path().to_path_buf(),
            };

            if migrated == Some(index) {
                queue.enqueue(link);
                continue;
            }

            match classify(slave.path(), classify_against)? {
                LocationState::SymlinkValid(_) => {}
                LocationState::Absent => queue.enqueue(link),
                LocationState::SymlinkBroken | LocationState::SymlinkForeign(_) => {
                    queue.enqueue(Operation::RemoveEntry {
                        at: slave.path().to_path_buf(),
                    });
                    queue.enqueue(link);
                }
                existing @ LocationState::RegularFile => {
                    queue.enqueue(Operation::PromptReplace {
                        existing,
                        replacement: target,
                        at: slave.path().to_path_buf(),
                        materialize: Materialize::Link,
                    });
                }
                LocationState::Unsupported => {}
            }
        }
        Ok(())
    }

    fn restore_one(
        &self,
        tracked: &TrackedPath,
        mode: RestoreMode,
        queue: &mut OperationQueue,
    ) -> Result<()> {
        let Some(resolved) = self.inspect(tracked, queue)? else {
            return Ok(());
        };
        let Some(index) = resolved.find_master()? else {
            let warning = format!(
                "unable to find \"{}\" in repo, skipping",
                tracked.path().display()
            );
            log::warn!("{warning}");
            queue.add_warning(warning);
            return Ok(());
        };

        let master = resolved.categories[index].path();
        let home = resolved.home.path();
        let state = classify(home, Some(master))?;
        let plugin = resolved.plugin;

        let mode = if plugin.is_passthrough() {
            mode
        } else {
            RestoreMode::Copy
        };

        match mode {
            RestoreMode::Link => match state {
                LocationState::SymlinkValid(_) => {}
                LocationState::Absent => queue.enqueue(Operation::CreateSymlink {
                    target: master.to_path_buf(),
                    at: home.to_path_buf(),
                }),
                existing => queue.enqueue(Operation::PromptReplace {
                    existing,
                    replacement: master.to_path_buf(),
                    at: home.to_path_buf(),
                    materialize: Materialize::Link,
                }),
            },
            RestoreMode::Copy => {
                let copy = Operation::CopyContent {
                    from: master.to_path_buf(),
                    to: home.to_path_buf(),
                    plugin: plugin.name().to_string(),
                };
                match state {
                    LocationState::Absent => queue.enqueue(copy),
                    LocationState::SymlinkValid(_) => {
                        queue.enqueue(Operation::RemoveEntry {
                            at: home.to_path_buf(),
                        });
                        queue.enqueue(copy);
                    }
                    LocationState::RegularFile if same_content(plugin, master, home)? => {}
                    existing => queue.enqueue(Operation::PromptReplace {
                        existing,
                        replacement: master.to_path_buf(),
                        at: home.to_path_buf(),
                        materialize: Materialize::Copy(plugin.name().to_string()),
                    }),
                }
            }
        }
        Ok(())
    }

    fn clean_one(&self, tracked: &TrackedPath, hard: bool, queue: &mut OperationQueue) -> Result<()> {
        let Some(resolved) = self.inspect(tracked, queue)? else {
            return Ok(());
        };
        let master = resolved
            .find_master()?
            .map(|index| resolved.categories[index].path());
        let home = resolved.home.path();

        let managed = match classify(home, master)? {
            LocationState::SymlinkValid(_) => true,
            LocationState::SymlinkForeign(_) => points_into(home, &resolved.categories),
            LocationState::SymlinkBroken => {
                let destination = link_destination(home, &fs::read_link(home)?);
                resolved
                    .categories
                    .iter()
                    .any(|location| resolve_components(location.path()) == destination)
            }
            LocationState::RegularFile => hard,
            LocationState::Absent | LocationState::Unsupported => false,
        };

        if managed {
            queue.enqueue(Operation::RemoveEntry {
                at: home.to_path_buf(),
            });
        } else {
            log::debug!("leaving \"{}\" untouched", home.display());
        }
        Ok(())
    }
}

/// Whether the symlink at `home` resolves to one of the category locations.
fn points_into(home: &Path, categories: &[Location]) -> bool {
    let Ok(resolved) = fs::canonicalize(home) else {
        return false;
    };
    categories
        .iter()
        .filter_map(|location| fs::canonicalize(location.path()).ok())
        .any(|candidate| candidate == resolved)
}

/// Whether the raw home file matches the decoded master.
fn same_content(plugin: &dyn StoragePlugin, master: &Path, home: &Path) -> Result<bool> {
    let stored = fs::read(master)?;
    let decoded = plugin.decode(&stored).map_err(|e| Error::ContractViolation {
        plugin: plugin.name().to_string(),
        details: format!("cannot decode {}: {e}", master.display()),
    })?;
    Ok(decoded == fs::read(home)?)
}

/// Home path and current master of `tracked`.
pub(crate) fn home_and_master(
    registry: &PluginRegistry,
    tracked: &TrackedPath,
) -> Result<(PathBuf, Option<PathBuf>)> {
    let resolved = Planner::new(registry).resolve(tracked)?;
    let master = resolved
        .find_master()?
        .map(|index| resolved.categories[index].path().to_path_buf());
    Ok((resolved.home.path().to_path_buf(), master))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        home: PathBuf,
        store: PathBuf,
        registry: PluginRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let home = dir.path().join("home");
            let store = dir.path().join("repo").join("dotfiles");
            fs::create_dir_all(&home).unwrap();
            let registry = PluginRegistry::plain(&store, &home).unwrap();
            Self {
                _dir: dir,
                home,
                store: store.join("plain"),
                registry,
            }
        }

        fn cat(&self, category: &str, name: &str) -> PathBuf {
            self.store.join(category).join(name)
        }

        fn write(path: &Path, content: &str) {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn planner(&self) -> Planner<'_> {
            Planner::new(&self.registry)
        }
    }

    fn tracked(categories: &[&str]) -> Vec<TrackedPath> {
        vec![TrackedPath::new("file", categories.iter().copied()).unwrap()]
    }

    #[test]
    fn test_update_empty_creates_master() {
        let fx = Fixture::new();
        let queue = fx.planner().plan_update(&tracked(&["cat1", "cat2"])).unwrap();

        assert_eq!(
            queue.ops(),
            &[
                Operation::CreateEmpty {
                    at: fx.cat("cat1", "file"),
                    plugin: "plain".into(),
                },
                Operation::CreateSymlink {
                    target: PathBuf::from("../cat1/file"),
                    at: fx.cat("cat2", "file"),
                },
            ]
        );
        assert!(queue.warnings()[0].contains("unable to find any candidates"));
    }

    #[test]
    fn test_update_moves_home_content() {
        let fx = Fixture::new();
        Fixture::write(&fx.home.join("file"), "hello");

        let queue = fx.planner().plan_update(&tracked(&["cat1"])).unwrap();
        assert_eq!(
            queue.ops(),
            &[Operation::MoveContent {
                from: fx.home.join("file"),
                to: fx.cat("cat1", "file"),
                encode_with: Some("plain".into()),
            }]
        );
        assert!(queue.warnings().is_empty());
    }

    #[test]
    fn test_update_prefers_store_over_home() {
        let fx = Fixture::new();
        Fixture::write(&fx.home.join("file"), "home");
        Fixture::write(&fx.cat("cat1", "file"), "store");

        let queue = fx.planner().plan_update(&tracked(&["cat1"])).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_update_migrates_master_to_first_category() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat2", "file"), "content");

        let queue = fx.planner().plan_update(&tracked(&["cat1", "cat2"])).unwrap();
        assert_eq!(
            queue.ops(),
            &[
                Operation::MoveContent {
                    from: fx.cat("cat2", "file"),
                    to: fx.cat("cat1", "file"),
                    encode_with: None,
                },
                Operation::CreateSymlink {
                    target: PathBuf::from("../cat1/file"),
                    at: fx.cat("cat2", "file"),
                },
            ]
        );
    }

    #[test]
    fn test_update_heals_broken_slave() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");
        fs::create_dir_all(fx.store.join("cat2")).unwrap();
        symlink("../cat1/gone", fx.cat("cat2", "file")).unwrap();

        let queue = fx.planner().plan_update(&tracked(&["cat1", "cat2"])).unwrap();
        assert_eq!(queue.len(), 2);
        assert!(matches!(queue.ops()[0], Operation::RemoveEntry { .. }));
        assert!(matches!(queue.ops()[1], Operation::CreateSymlink { .. }));
    }

    #[test]
    fn test_update_prompts_for_divergent_slave() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "one");
        Fixture::write(&fx.cat("cat2", "file"), "two");

        let queue = fx.planner().plan_update(&tracked(&["cat1", "cat2"])).unwrap();
        assert_eq!(
            queue.ops(),
            &[Operation::PromptReplace {
                existing: LocationState::RegularFile,
                replacement: PathBuf::from("../cat1/file"),
                at: fx.cat("cat2", "file"),
                materialize: Materialize::Link,
            }]
        );
    }

    #[test]
    fn test_update_converged_is_empty() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");
        fs::create_dir_all(fx.store.join("cat2")).unwrap();
        symlink("../cat1/file", fx.cat("cat2", "file")).unwrap();

        let queue = fx.planner().plan_update(&tracked(&["cat1", "cat2"])).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_restore_skips_missing_master() {
        let fx = Fixture::new();
        Fixture::write(&fx.home.join("file"), "mine");

        let queue = fx.planner().plan_restore(&tracked(&["cat1"])).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.warnings(), ["unable to find \"file\" in repo, skipping"]);
    }

    #[test]
    fn test_restore_links_absent_home() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");

        let queue = fx.planner().plan_restore(&tracked(&["cat1"])).unwrap();
        assert_eq!(
            queue.ops(),
            &[Operation::CreateSymlink {
                target: fx.cat("cat1", "file"),
                at: fx.home.join("file"),
            }]
        );
    }

    #[test]
    fn test_restore_prompts_for_home_content() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");
        Fixture::write(&fx.home.join("file"), "mine");

        let queue = fx.planner().plan_restore(&tracked(&["cat1"])).unwrap();
        assert!(queue.ops()[0].is_interactive());
    }

    #[test]
    fn test_restore_copy_mode() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");
        symlink(fx.cat("cat1", "file"), fx.home.join("file")).unwrap();

        let queue = fx
            .planner()
            .plan_restore_with(&tracked(&["cat1"]), RestoreMode::Copy)
            .unwrap();
        assert_eq!(queue.len(), 2);
        assert!(matches!(queue.ops()[1], Operation::CopyContent { .. }));

        fs::remove_file(fx.home.join("file")).unwrap();
        Fixture::write(&fx.home.join("file"), "content");
        let queue = fx
            .planner()
            .plan_restore_with(&tracked(&["cat1"]), RestoreMode::Copy)
            .unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clean_modes() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");
        Fixture::write(&fx.home.join("file"), "mine");

        assert!(fx.planner().plan_clean(&tracked(&["cat1"]), false).unwrap().is_empty());
        assert_eq!(fx.planner().plan_clean(&tracked(&["cat1"]), true).unwrap().len(), 1);

        fs::remove_file(fx.home.join("file")).unwrap();
        symlink(fx.cat("cat1", "file"), fx.home.join("file")).unwrap();
        assert_eq!(fx.planner().plan_clean(&tracked(&["cat1"]), false).unwrap().len(), 1);
    }

    #[test]
    fn test_clean_leaves_foreign_link() {
        let fx = Fixture::new();
        Fixture::write(&fx.cat("cat1", "file"), "content");
        Fixture::write(&fx.home.join("elsewhere"), "other");
        symlink(fx.home.join("elsewhere"), fx.home.join("file")).unwrap();

        assert!(fx.planner().plan_clean(&tracked(&["cat1"]), true).unwrap().is_empty());
    }

    #[test]
    fn test_clean_removes_broken_link_into_store() {
        let fx = Fixture::new();
        symlink(fx.cat("cat1", "file"), fx.home.join("file")).unwrap();

        let queue = fx.planner().plan_clean(&tracked(&["cat1"]), false).unwrap();
        assert_eq!(
            queue.ops(),
            &[Operation::RemoveEntry {
                at: fx.home.join("file"),
            }]
        );
    }

    #[test]
    fn test_directory_is_skipped_with_warning() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.home.join("file")).unwrap();

        let queue = fx.planner().plan_update(&tracked(&["cat1"])).unwrap();
        assert!(queue.is_empty());
        assert!(queue.warnings()[0].contains("neither a file nor a symlink"));
    }

    #[test]
    fn test_path_below_home_file_is_skipped_alone() {
        let fx = Fixture::new();
        Fixture::write(&fx.home.join(".config"), "not a directory");
        Fixture::write(&fx.home.join(".vimrc"), "set nu");
        let filelist = vec![
            TrackedPath::new(".config/app", ["cat1"]).unwrap(),
            TrackedPath::new(".vimrc", ["cat1"]).unwrap(),
        ];

        let queue = fx.planner().plan_update(&filelist).unwrap();

        assert_eq!(queue.warnings().len(), 1);
        assert!(queue.warnings()[0].contains(".config/app"));
        assert_eq!(
            queue.ops(),
            &[Operation::MoveContent {
                from: fx.home.join(".vimrc"),
                to: fx.cat("cat1", ".vimrc"),
                encode_with: Some("plain".into()),
            }]
        );

        let restore = fx.planner().plan_restore(&filelist).unwrap();
        assert!(restore.warnings()[0].contains(".config/app"));
    }

    #[test]
    fn test_update_copy_mode_stores_edited_home_copy() {
        let fx = Fixture::new();
        Fixture::write(&fx.home.join("file"), "edited");
        Fixture::write(&fx.cat("cat1", "file"), "stored");

        let queue = fx
            .planner()
            .plan_update_with(&tracked(&["cat1"]), RestoreMode::Copy)
            .unwrap();
        assert_eq!(
            queue.ops(),
            &[Operation::PromptReplace {
                existing: LocationState::RegularFile,
                replacement: fx.home.join("file"),
                at: fx.cat("cat1", "file"),
                materialize: Materialize::Encode("plain".into()),
            }]
        );

        // Link mode leaves the divergence to restore
        assert!(fx.planner().plan_update(&tracked(&["cat1"])).unwrap().is_empty());
    }

    #[test]
    fn test_update_copy_mode_ignores_identical_home_copy() {
        let fx = Fixture::new();
        Fixture::write(&fx.home.join("file"), "same");
        Fixture::write(&fx.cat("cat1", "file"), "same");

        let queue = fx
            .planner()
            .plan_update_with(&tracked(&["cat1"]), RestoreMode::Copy)
            .unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unknown_plugin_is_error() {
        let fx = Fixture::new();
        let filelist = vec![TrackedPath::with_plugin("file", ["cat1"], "encrypt").unwrap()];
        assert!(matches!(
            fx.planner().plan_update(&filelist),
            Err(Error::UnknownPlugin { .. })
        ));
    }
}
