//! Bundler plugin descriptors and the per-environment plugin sets.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ProjectSettings;
use crate::environment::Environment;

/// Well-known plugin names understood by the bundler adapter.
pub mod names {
    pub const NAMED_MODULES: &str = "NamedModulesPlugin";
    pub const HOT_MODULE_REPLACEMENT: &str = "HotModuleReplacementPlugin";
    pub const SCRIPT_MINIFIER: &str = "UglifyJsPlugin";
    pub const CSS_EXTRACT: &str = "MiniCssExtractPlugin";
    pub const HTML_TEMPLATE: &str = "HtmlWebpackPlugin";
    pub const FAVICONS: &str = "FaviconsWebpackPlugin";
    pub const CSP: &str = "CspHtmlWebpackPlugin";
    pub const VERSION_TEMPLATE: &str = "VersionTemplatePlugin";
    pub const DEFINE: &str = "DefinePlugin";
    pub const COPY: &str = "CopyWebpackPlugin";
}

/// One plugin instance: its name and constructor options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    #[serde(rename = "plugin")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// A plugin constructed without options.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    /// Build a plugin from any serializable options value.
    pub fn with_options<T: Serialize>(
        name: impl Into<String>,
        options: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(name, serde_json::to_value(options)?))
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Plugins shared by every environment.
pub fn common_plugins() -> Vec<PluginSpec> {
    Vec::new()
}

/// Environment-specific plugins, not including the common set.
pub fn environment_plugins(settings: &ProjectSettings, env: Environment) -> Vec<PluginSpec> {
    match env {
        Environment::Development => vec![
            PluginSpec::bare(names::NAMED_MODULES),
            PluginSpec::bare(names::HOT_MODULE_REPLACEMENT),
        ],
        Environment::Production => vec![script_minifier(settings)],
        Environment::Test => Vec::new(),
    }
}

fn script_minifier(settings: &ProjectSettings) -> PluginSpec {
    let defaults = json!({
        "test": "\\.jsx($|\\?)",
        "uglifyOptions": {
            "ecma": 5,
            "output": {
                "comments": true,
                "beautify": false
            }
        }
    });

    // Project options replace top-level keys, like a shallow object assign.
    let options = match &settings.prod_bundle_options {
        Some(Value::Object(extra)) => {
            let mut merged = defaults;
            if let Value::Object(map) = &mut merged {
                for (key, value) in extra {
                    map.insert(key.clone(), value.clone());
                }
            }
            merged
        }
        _ => defaults,
    };

    PluginSpec::new(names::SCRIPT_MINIFIER, options)
}
