//! Entry point composition.

use crate::config::{EntrySource, OrderedMap, ProjectSettings};
use crate::environment::Environment;
use crate::paths::entry_bundle_name;

/// Bundle name to source paths, in declaration order.
pub type EntryMap = OrderedMap<Vec<String>>;

/// Stylesheet sources for a brand, falling back to the project default
/// stylesheet when the journey declares none usable.
fn style_paths(settings: &ProjectSettings, source: Option<&EntrySource>, brand: &str) -> Vec<String> {
    let resolved = source.map(|s| s.resolve(brand)).unwrap_or_default();
    if !resolved.is_empty() {
        return resolved;
    }
    settings.default_stylesheet.iter().cloned().collect()
}

/// Compose the entry map for a tuple.
///
/// Styles are appended to the first declared entry only. A journey without
/// entries (or an unknown journey) composes to an empty map.
pub fn compose_entry(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
    brand: &str,
) -> EntryMap {
    let mut entries = EntryMap::new();
    let Some(config) = settings.journey(env, journey) else {
        return entries;
    };

    let styles = style_paths(settings, config.style_source(), brand);
    for (idx, (reference, source)) in config.script_refs().enumerate() {
        let mut paths = source.resolve(brand);
        if idx == 0 {
            paths.extend(styles.iter().cloned());
        }
        entries.insert(entry_bundle_name(settings, env, reference), paths);
    }

    entries
}
