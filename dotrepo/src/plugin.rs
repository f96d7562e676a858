//! Storage plugin contract.
//!
//! A plugin decides where the store copies of a tracked path live and how
//! their bytes are encoded at rest. The planner and executor never look at
//! store internals beyond the [`StoragePlugin`] trait, so alternative
//! encodings can be swapped in per tracked path.
//!
//! # Examples
//!
//! ```
//! use dotrepo::plugin::{PlainPlugin, PluginRegistry, StoragePlugin};
//! use dotrepo::TrackedPath;
//! use std::path::Path;
//!
//! let registry = PluginRegistry::plain("/repo/dotfiles", "/home/me").unwrap();
//! let plain = registry.get("plain").unwrap();
//!
//! let tracked = TrackedPath::new(".vimrc", ["common"]).unwrap();
//! let location = plain.resolve(&tracked, "common").unwrap();
//! assert_eq!(location.path(), Path::new("/repo/dotfiles/plain/common/.vimrc"));
//! assert_eq!(plain.decode(&plain.encode(b"set nu").unwrap()).unwrap(), b"set nu");
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::location::Location;
use crate::tracked::TrackedPath;

/// Storage plugin interface consumed by the planner and executor.
///
/// `decode(encode(x)) == x` must hold for every byte sequence, including
/// the empty one. Any out-of-band state a plugin needs (keys, caches) is
/// the plugin's own business.
pub trait StoragePlugin {
    /// Unique name the filelist uses to route paths to this plugin.
    fn name(&self) -> &str;

    /// Physical store location of `tracked` under `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be resolved.
    fn resolve(&self, tracked: &TrackedPath, category: &str) -> Result<Location>;

    /// Physical home location of `tracked`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be resolved.
    fn resolve_home(&self, tracked: &TrackedPath) -> Result<Location>;

    /// Converts raw home content into its stored form.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be encoded.
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Converts stored content back into raw home content.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be decoded.
    fn decode(&self, stored: &[u8]) -> Result<Vec<u8>>;

    /// Whether stored bytes equal raw bytes, so store files can be moved
    /// by rename and exposed to home through symlinks.
    fn is_passthrough(&self) -> bool {
        false
    }
}

/// Passthrough plugin storing files verbatim under
/// `<store>/<name>/<category>/<path>`.
#[derive(Debug, Clone)]
pub struct PlainPlugin {
    name: String,
    store_root: PathBuf,
    home_root: PathBuf,
}

impl PlainPlugin {
    /// Name the plain plugin registers under.
    pub const NAME: &'static str = "plain";

    /// Creates a plain plugin rooted at `store_dir/plain`.
    #[must_use]
    pub fn new(store_dir: impl AsRef<Path>, home_root: impl Into<PathBuf>) -> Self {
        Self {
            name: Self::NAME.to_string(),
            store_root: store_dir.as_ref().join(Self::NAME),
            home_root: home_root.into(),
        }
    }

    /// Root directory holding one sub-directory per category.
    #[must_use]
    pub fn store_root(&self) -> &Path {
        &self.store_root
    }
}

impl StoragePlugin for PlainPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, tracked: &TrackedPath, category: &str) -> Result<Location> {
        crate::tracked::validate_category(category)?;
        Ok(Location::category(
            category,
            self.store_root.join(category).join(tracked.path()),
        ))
    }

    fn resolve_home(&self, tracked: &TrackedPath) -> Result<Location> {
        Ok(Location::home(self.home_root.join(tracked.path())))
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decode(&self, stored: &[u8]) -> Result<Vec<u8>> {
        Ok(stored.to_vec())
    }

    fn is_passthrough(&self) -> bool {
        true
    }
}

/// Byte samples every plugin must round-trip before it is registered.
fn round_trip_samples() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"dotrepo\n".to_vec(),
        (0..=u8::MAX).collect(),
        vec![0; 4096],
    ]
}

/// Checks `decode(encode(x)) == x` for one sample.
///
/// # Errors
///
/// Returns `ContractViolation` when the round trip fails or changes the
/// bytes.
pub fn verify_round_trip(plugin: &dyn StoragePlugin, sample: &[u8]) -> Result<()> {
    let violation = |details: String| Error::ContractViolation {
        plugin: plugin.name().to_string(),
        details,
    };

    let encoded = plugin
        .encode(sample)
        .map_err(|e| violation(format!("encode failed: {e}")))?;
    let decoded = plugin
        .decode(&encoded)
        .map_err(|e| violation(format!("decode failed: {e}")))?;
    if decoded != sample {
        return Err(violation(format!(
            "decode(encode(x)) != x for a {}-byte sample",
            sample.len()
        )));
    }
    Ok(())
}

/// Explicit set of storage plugins, keyed by name.
///
/// Passed to the planner and executor at construction; there is no
/// process-wide registry.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Box<dyn StoragePlugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding only the plain plugin.
    ///
    /// # Errors
    ///
    /// Never fails in practice; registration errors are propagated.
    pub fn plain(store_dir: impl AsRef<Path>, home_root: impl Into<PathBuf>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(PlainPlugin::new(store_dir, home_root)))?;
        Ok(registry)
    }

    /// Adds a plugin after checking its round-trip contract.
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` if the plugin fails a sample round trip
    /// and `Validation` if the name is already taken.
    pub fn register(&mut self, plugin: Box<dyn StoragePlugin>) -> Result<()> {
        for sample in round_trip_samples() {
            verify_round_trip(plugin.as_ref(), &sample)?;
        }

        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(Error::Validation {
                field: "plugin".into(),
                message: format!("plugin '{name}' is already registered"),
            });
        }
        log::debug!("registered storage plugin '{name}'");
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Looks up a plugin by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlugin` if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&dyn StoragePlugin> {
        self.plugins
            .get(name)
            .map(|plugin| &**plugin)
            .ok_or_else(|| Error::UnknownPlugin {
                name: name.to_string(),
            })
    }

    /// Registered plugin names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}
