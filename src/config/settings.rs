//! Project settings (journeypack.toml)
//!
//! Environment, journey and brand tables plus lint, tool and command
//! configuration. Everything the composition engine reads comes from here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::merge::deep_merge;
use super::ordered::OrderedMap;
use crate::dispatch::CommandTemplates;
use crate::environment::Environment;
use crate::security::SecuritySettings;

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "journeypack.toml";

/// Name of the fallback brand in `brand_properties`.
pub const DEFAULT_BRAND: &str = "default";

/// Entry reference that holds stylesheet sources.
pub const STYLES_REF: &str = "styles";

/// Known lint scopes, in default execution order.
pub const LINT_SCOPES: [&str; 4] = ["configs", "base", "test", "style"];

/// Error types for settings operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Output directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output root, relative to the project root
    pub root: String,

    /// Directory for script bundles inside each output path
    pub scripts_dir: String,

    /// Directory for extracted stylesheets inside each output path
    pub styles_dir: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            root: defaults.output_root,
            scripts_dir: defaults.scripts_dir,
            styles_dir: defaults.styles_dir,
        }
    }
}

/// Source of one entry reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySource {
    /// A single path
    One(String),
    /// Several paths bundled together
    Many(Vec<String>),
    /// One path per brand
    PerBrand(BTreeMap<String, String>),
}

impl EntrySource {
    /// Paths for the given brand. A per-brand table without that brand yields nothing.
    pub fn resolve(&self, brand: &str) -> Vec<String> {
        match self {
            EntrySource::One(path) if path.is_empty() => Vec::new(),
            EntrySource::One(path) => vec![path.clone()],
            EntrySource::Many(paths) => paths.clone(),
            EntrySource::PerBrand(table) => table.get(brand).cloned().into_iter().collect(),
        }
    }
}

/// HTML template output of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlOutput {
    pub file_name: String,
    pub template: String,
}

/// A static copy pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySpec {
    pub from: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Configuration of one journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyConfig {
    /// Entry references in declaration order; `styles` is treated specially.
    #[serde(default)]
    pub entry: OrderedMap<EntrySource>,

    pub html_output: HtmlOutput,

    #[serde(default)]
    pub copy: Vec<CopySpec>,

    /// Build one unbranded configuration even if brands are declared.
    #[serde(default)]
    pub no_brands: bool,
}

impl JourneyConfig {
    /// Declared entry references other than `styles`.
    pub fn script_refs(&self) -> impl Iterator<Item = (&str, &EntrySource)> {
        self.entry.iter().filter(|(name, _)| *name != STYLES_REF)
    }

    pub fn style_source(&self) -> Option<&EntrySource> {
        self.entry.get(STYLES_REF)
    }
}

/// Settings for one environment (`[environments.<env>]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSettings {
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Disable content hashes in production file names.
    #[serde(default)]
    pub no_hash: bool,

    /// Release version directory appended to each output path.
    #[serde(default)]
    pub release_version: Option<String>,

    /// Script injection policy passed to the HTML template plugin.
    #[serde(default = "default_true")]
    pub inject: bool,

    /// HTML minification: `false`, `true` or an options table.
    #[serde(default)]
    pub html_minify: Option<Value>,

    #[serde(default)]
    pub favicon: Option<String>,

    /// Declared brands, in build order.
    #[serde(default)]
    pub brands: Vec<String>,

    /// Properties per brand; `default` is the fallback.
    #[serde(default)]
    pub brand_properties: BTreeMap<String, Value>,

    #[serde(default)]
    pub security: Option<SecuritySettings>,

    #[serde(default)]
    pub journeys: BTreeMap<String, JourneyConfig>,

    /// Bundler-level overrides, merged last.
    #[serde(default)]
    pub bundler: serde_json::Map<String, Value>,
}

impl EnvironmentSettings {
    /// Brand properties merged over the `default` brand's properties.
    pub fn brand_properties_for(&self, brand: &str) -> Value {
        let base = self
            .brand_properties
            .get(DEFAULT_BRAND)
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        match self.brand_properties.get(brand) {
            Some(props) if brand != DEFAULT_BRAND => deep_merge(base, props.clone()),
            _ => base,
        }
    }

    /// Whether file names carry content hashes.
    pub fn hashes_enabled(&self, env: Environment) -> bool {
        env.is_production() && !self.no_hash
    }
}

/// Lint targets per scope (`[lint]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintSettings {
    pub configs: Vec<String>,
    pub base: Vec<String>,
    pub test: Vec<String>,
    pub style: Vec<String>,
}

impl LintSettings {
    /// Paths of a scope, `None` for unknown scope names.
    pub fn scope(&self, name: &str) -> Option<&[String]> {
        match name {
            "configs" => Some(&self.configs),
            "base" => Some(&self.base),
            "test" => Some(&self.test),
            "style" => Some(&self.style),
            _ => None,
        }
    }
}

/// Tool configuration files (`[tools]`). A tool counts as configured when its
/// file is set and exists under the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub doc: Option<String>,
    pub eslint: Option<String>,
    pub mock: Option<String>,
    pub test: Option<String>,
}

/// Root of journeypack.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Development server port; reporting uses `port + 1`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Asset inlining limit in bytes. Unset falls back to the built-in
    /// default; an explicit `0` is kept.
    #[serde(default)]
    pub assets_bundle_limit: Option<u64>,

    /// Extra options merged into the production script minifier.
    #[serde(default)]
    pub prod_bundle_options: Option<Value>,

    /// Include the journey name in output and dev base paths.
    #[serde(default = "default_true")]
    pub journeys_enabled: bool,

    /// Stylesheet used when a journey declares no usable `styles` source.
    #[serde(default)]
    pub default_stylesheet: Option<String>,

    /// Path reporting tooling serves from.
    #[serde(default)]
    pub report_path: Option<String>,

    /// Bundler configuration adapter handed to build and server commands.
    #[serde(default = "default_bundler_config")]
    pub bundler_config: String,

    /// PostCSS configuration handed to the stylesheet loaders.
    #[serde(default = "default_postcss_config")]
    pub postcss_config: String,

    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentSettings>,

    #[serde(default)]
    pub lint: LintSettings,

    #[serde(default)]
    pub tools: ToolSettings,

    #[serde(default)]
    pub commands: CommandTemplates,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_port() -> u16 {
    BuiltinDefaults::default().port
}

fn default_public_path() -> String {
    BuiltinDefaults::default().public_path
}

fn default_bundler_config() -> String {
    "webpack.config.js".to_string()
}

fn default_postcss_config() -> String {
    "postcss.config.js".to_string()
}

fn default_true() -> bool {
    true
}

impl ProjectSettings {
    /// Load and parse settings from a TOML file. The file's directory becomes
    /// the project root.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::from_str(&contents)?.with_project_root(root))
    }

    /// Parse settings from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let mut settings: ProjectSettings = toml::from_str(s)?;
        settings.project_root = PathBuf::from(".");
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, env) in &self.environments {
            // Rule: environment keys are environment names
            if name.parse::<Environment>().map(|e| e.as_str() != name).unwrap_or(true) {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown environment '{}': use development, production or test",
                    name
                )));
            }

            // Rule: brand properties need the default fallback
            if !env.brand_properties.is_empty()
                && !env.brand_properties.contains_key(DEFAULT_BRAND)
            {
                return Err(ConfigError::ValidationError(format!(
                    "environments.{}.brand_properties must define '{}'",
                    name, DEFAULT_BRAND
                )));
            }

            // Rule: brands are non-empty and unique
            let mut seen = BTreeSet::new();
            for brand in &env.brands {
                if brand.trim().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "environments.{}.brands contains an empty brand",
                        name
                    )));
                }
                if !seen.insert(brand.as_str()) {
                    return Err(ConfigError::ValidationError(format!(
                        "environments.{}.brands lists '{}' twice",
                        name, brand
                    )));
                }
            }

            // Rule: overrides keep the shape of the composed sections
            let module = env.bundler.get("module");
            let sections = [
                ("output", "a table", env.bundler.get("output").map_or(true, Value::is_object)),
                ("plugins", "an array", env.bundler.get("plugins").map_or(true, Value::is_array)),
                ("module", "a table", module.map_or(true, Value::is_object)),
                (
                    "module.rules",
                    "an array",
                    module.and_then(|m| m.get("rules")).map_or(true, Value::is_array),
                ),
            ];
            if let Some((section, expected, _)) = sections.iter().find(|(_, _, ok)| !ok) {
                return Err(ConfigError::ValidationError(format!(
                    "environments.{}.bundler.{} must be {}",
                    name, section, expected
                )));
            }

            // Rule: every journey names its HTML output
            for (journey, config) in &env.journeys {
                if config.html_output.file_name.trim().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "environments.{}.journeys.{}.html_output.file_name cannot be empty",
                        name, journey
                    )));
                }
            }
        }

        Ok(())
    }

    /// Settings for an environment, if declared.
    pub fn environment(&self, env: Environment) -> Option<&EnvironmentSettings> {
        self.environments.get(env.as_str())
    }

    /// A journey's configuration, if declared for the environment.
    pub fn journey(&self, env: Environment, journey: &str) -> Option<&JourneyConfig> {
        if journey.is_empty() {
            return None;
        }
        self.environment(env)?.journeys.get(journey)
    }

    /// Journey names declared for an environment, in name order.
    pub fn journey_names(&self, env: Environment) -> Vec<&str> {
        self.environment(env)
            .map(|e| e.journeys.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Asset inlining limit, falling back to the built-in default when unset.
    pub fn assets_limit(&self) -> u64 {
        self.assets_bundle_limit
            .unwrap_or_else(|| BuiltinDefaults::default().assets_bundle_limit)
    }

    pub fn report_path(&self) -> String {
        self.report_path
            .clone()
            .unwrap_or_else(|| BuiltinDefaults::default().report_path)
    }

    /// Resolve a path relative to the project root.
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }
}
