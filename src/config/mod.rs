//! Project configuration
//!
//! Settings file model, built-in defaults and the layered merge used to
//! assemble build configurations:
//! 1. Common defaults
//! 2. Environment defaults
//! 3. Journey/brand composition
//! 4. Explicit environment overrides (`[environments.<env>.bundler]`)

mod defaults;
mod merge;
mod ordered;
mod settings;

pub use defaults::BuiltinDefaults;
pub use merge::{deep_merge, merge_layers, smart_merge, LayerOrigin, MergeLayer};
pub use ordered::OrderedMap;
pub use settings::{
    ConfigError, CopySpec, EntrySource, EnvironmentSettings, HtmlOutput, JourneyConfig,
    LintSettings, OutputSettings, ProjectSettings, ToolSettings, DEFAULT_BRAND,
    DEFAULT_SETTINGS_FILE, LINT_SCOPES, STYLES_REF,
};
