//! Output descriptor, stylesheet extraction and copy patterns.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{CopySpec, ProjectSettings};
use crate::environment::Environment;
use crate::paths::{resolve_output_path, style_output_path};
use crate::plugins::{names, PluginSpec};

const HASH_SUFFIX: &str = ".[chunkhash]";

/// Where and under which names the bundler writes its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDescriptor {
    pub filename: String,
    pub chunk_filename: String,
    pub public_path: String,
    pub path: String,
}

fn hashed_name(stem: &str, hashed: bool, ext: &str) -> String {
    if hashed {
        format!("{}{}.{}", stem, HASH_SUFFIX, ext)
    } else {
        format!("{}.{}", stem, ext)
    }
}

/// Compose the output descriptor. `None` for an unknown journey.
pub fn compose_output(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
    brand: &str,
) -> Option<OutputDescriptor> {
    let path = resolve_output_path(settings, env, journey, brand)?;
    let public_path = settings.environment(env)?.public_path.clone();

    Some(OutputDescriptor {
        filename: hashed_name("[name]", path.hashed, "js"),
        chunk_filename: hashed_name("[id]", path.hashed, "js"),
        public_path,
        path: path.full(),
    })
}

/// Stylesheet extraction plugin. Development keeps styles inline, and
/// journeys without a style source extract nothing.
pub fn compose_style_extract(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
) -> Option<PluginSpec> {
    if env.is_development() {
        return None;
    }
    settings.journey(env, journey)?.style_source()?;
    let stem = style_output_path(settings, env, journey)?;
    let hashed = settings.environment(env)?.hashes_enabled(env);

    Some(PluginSpec::new(
        names::CSS_EXTRACT,
        json!({ "filename": hashed_name(&stem, hashed, "css") }),
    ))
}

/// Static copy patterns of a journey; empty when none are declared.
pub fn compose_copy(settings: &ProjectSettings, env: Environment, journey: &str) -> Vec<CopySpec> {
    settings
        .journey(env, journey)
        .map(|config| config.copy.clone())
        .unwrap_or_default()
}
