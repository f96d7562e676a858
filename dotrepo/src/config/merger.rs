//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use dotrepo::config::{Config, ConfigMerger};
///
/// let low = Config { default_plugin: Some("low".to_string()), ..Default::default() };
/// let high = Config { default_plugin: Some("high".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.default_plugin, Some("high".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources, given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Every field is replaced wholesale when set in `source`; category
    /// lists are not unioned, so a higher layer can narrow the active set.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.home.is_some() {
            target.home.clone_from(&source.home);
        }

        if source.store_dir.is_some() {
            target.store_dir.clone_from(&source.store_dir);
        }

        if source.filelist.is_some() {
            target.filelist.clone_from(&source.filelist);
        }

        if source.categories.is_some() {
            target.categories.clone_from(&source.categories);
        }

        if source.default_plugin.is_some() {
            target.default_plugin.clone_from(&source.default_plugin);
        }

        if source.conflict_policy.is_some() {
            target.conflict_policy = source.conflict_policy;
        }
    }
}
