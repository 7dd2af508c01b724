//! Output path resolution
//!
//! Every path here is a pure function of the settings and the
//! (environment, journey, brand) tuple. Unknown journeys resolve to `None`
//! so composers can skip them instead of failing.

use serde::{Deserialize, Serialize};

use crate::config::{BuiltinDefaults, ProjectSettings};
use crate::environment::Environment;

/// Placeholder substituted with a digest of the file content when written.
pub const CONTENT_HASH_PLACEHOLDER: &str = "[contenthash]";

/// Resolved output location for one (environment, journey, brand) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPath {
    /// Output root from the environment settings
    pub root: String,

    /// Journey/brand segment; empty when neither applies
    pub brand_segment: String,

    /// Release version segment, if configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_segment: Option<String>,

    /// Whether emitted file names carry content hashes
    pub hashed: bool,
}

impl OutputPath {
    /// Root joined with the journey/brand segment.
    pub fn base(&self) -> String {
        join_segments(&[&self.root, &self.brand_segment])
    }

    /// Base joined with the release version segment.
    pub fn full(&self) -> String {
        join_segments(&[&self.base(), self.version_segment.as_deref().unwrap_or("")])
    }
}

fn join_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `journey/brand`, dropping the journey when multi-journey mode is off and
/// the brand when it is empty.
pub fn journey_brand_path(journeys_enabled: bool, journey: &str, brand: &str) -> String {
    let journey = if journeys_enabled { journey } else { "" };
    join_segments(&[journey, brand])
}

/// Resolve the output path for a tuple. `None` when the environment or the
/// journey is not declared.
pub fn resolve_output_path(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
    brand: &str,
) -> Option<OutputPath> {
    settings.journey(env, journey)?;
    let env_settings = settings.environment(env)?;

    Some(OutputPath {
        root: env_settings.output.root.clone(),
        brand_segment: journey_brand_path(settings.journeys_enabled, journey, brand),
        version_segment: env_settings
            .release_version
            .clone()
            .filter(|v| !v.trim().is_empty()),
        hashed: env_settings.hashes_enabled(env),
    })
}

/// Version file location under a base output path.
pub fn version_file_path(base: &str, no_hash: bool) -> String {
    let stem = BuiltinDefaults::default().version_file;
    let name = if no_hash {
        format!("{}.json", stem)
    } else {
        format!("{}.{}.json", stem, CONTENT_HASH_PLACEHOLDER)
    };
    join_segments(&[base, &name])
}

/// Extracted stylesheet name (without extension) for a journey.
pub fn style_output_path(settings: &ProjectSettings, env: Environment, journey: &str) -> Option<String> {
    settings.journey(env, journey)?;
    let env_settings = settings.environment(env)?;
    Some(join_segments(&[&env_settings.output.styles_dir, journey]))
}

/// Bundle name of an entry reference.
pub fn entry_bundle_name(settings: &ProjectSettings, env: Environment, reference: &str) -> String {
    let scripts_dir = settings
        .environment(env)
        .map(|e| e.output.scripts_dir.clone())
        .unwrap_or_else(|| BuiltinDefaults::default().scripts_dir);
    join_segments(&[&scripts_dir, reference])
}
