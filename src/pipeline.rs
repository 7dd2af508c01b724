//! Build configuration pipeline
//!
//! Composes one build configuration per (environment, journey, brand):
//! - Common rules and plugins
//! - Environment rules and plugins
//! - Journey/brand composition (entry, output, templates, versioning)
//! - Explicit bundler overrides from the environment settings
//!
//! The layers go through `merge_layers`, so the precedence above holds no
//! matter the order they are assembled in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::compose::{
    compose_copy, compose_define, compose_entry, compose_output, compose_scout_template,
    compose_style_extract, compose_template,
};
use crate::config::{merge_layers, LayerOrigin, MergeLayer, ProjectSettings};
use crate::environment::Environment;
use crate::paths::{resolve_output_path, version_file_path};
use crate::plugins::{common_plugins, environment_plugins, names, PluginSpec};
use crate::rules::{common_rules, environment_rules};
use crate::version::VersionTarget;

/// Composition errors
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("failed to serialize {fragment}: {source}")]
    Serialize {
        fragment: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("merged configuration for {journey}/{brand} is invalid: {source}")]
    InvalidMerge {
        journey: String,
        brand: String,
        #[source]
        source: serde_json::Error,
    },
}

fn to_value<T: Serialize>(fragment: &'static str, value: &T) -> Result<Value, ComposeError> {
    serde_json::to_value(value).map_err(|source| ComposeError::Serialize { fragment, source })
}

/// `module` section of a build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSection {
    #[serde(default)]
    pub rules: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fully merged build configuration for one tuple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    /// Composed as a map of bundle name to files; an override may replace it
    /// with any shape the bundler accepts (a path, a list, a map).
    #[serde(default)]
    pub entry: Value,

    #[serde(default)]
    pub output: Map<String, Value>,

    #[serde(default)]
    pub module: ModuleSection,

    #[serde(default)]
    pub plugins: Vec<Value>,

    /// Bundler keys outside the composed sections, taken from overrides.
    #[serde(flatten)]
    pub overrides: Map<String, Value>,
}

impl BuildConfiguration {
    /// Merge layers by precedence and read the result back.
    pub fn from_layers(
        layers: Vec<MergeLayer>,
        journey: &str,
        brand: &str,
    ) -> Result<Self, ComposeError> {
        serde_json::from_value(merge_layers(layers)).map_err(|source| ComposeError::InvalidMerge {
            journey: journey.to_string(),
            brand: brand.to_string(),
            source,
        })
    }

    /// Number of plugin instances with the given name.
    pub fn plugin_count(&self, name: &str) -> usize {
        self.plugins
            .iter()
            .filter(|p| p.get("plugin").and_then(Value::as_str) == Some(name))
            .count()
    }

    /// Options of the first plugin with the given name.
    pub fn plugin_options(&self, name: &str) -> Option<&Value> {
        self.plugins
            .iter()
            .find(|p| p.get("plugin").and_then(Value::as_str) == Some(name))
            .and_then(|p| p.get("options"))
    }

    /// Version file target, present on production configurations.
    pub fn version_target(&self) -> Option<VersionTarget> {
        self.plugin_options(names::VERSION_TEMPLATE)
            .and_then(|options| serde_json::from_value(options.clone()).ok())
    }

    /// Bundle names of a map-shaped entry, in order.
    pub fn entry_names(&self) -> Vec<&str> {
        self.entry
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Files of one named bundle, whether listed or given as a single path.
    pub fn entry_files(&self, name: &str) -> Option<Vec<&str>> {
        match self.entry.get(name)? {
            Value::String(path) => Some(vec![path.as_str()]),
            Value::Array(paths) => Some(paths.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    /// Whether there is nothing to build.
    pub fn is_empty(&self) -> bool {
        match &self.entry {
            Value::Null => true,
            Value::String(path) => path.is_empty(),
            Value::Array(paths) => paths.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

fn plugin<T: Serialize>(
    name: &str,
    fragment: &'static str,
    options: &T,
) -> Result<PluginSpec, ComposeError> {
    PluginSpec::with_options(name, options)
        .map_err(|source| ComposeError::Serialize { fragment, source })
}

fn static_layer(origin: LayerOrigin, rules: Value, plugins: Value) -> MergeLayer {
    MergeLayer::new(origin, json!({ "module": { "rules": rules }, "plugins": plugins }))
}

/// Compose the build configuration for a tuple. `Ok(None)` when the
/// environment or journey is unknown.
pub fn compose_build_config(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
    brand: &str,
) -> Result<Option<BuildConfiguration>, ComposeError> {
    let Some(env_settings) = settings.environment(env) else {
        return Ok(None);
    };
    let (Some(output), Some(template)) = (
        compose_output(settings, env, journey, brand),
        compose_template(settings, env, journey, brand),
    ) else {
        return Ok(None);
    };

    let mut plugins: Vec<PluginSpec> = Vec::new();
    plugins.extend(compose_style_extract(settings, env, journey));
    plugins.push(plugin(names::HTML_TEMPLATE, "template", &template)?);
    if let Some(favicon) = &env_settings.favicon {
        plugins.push(PluginSpec::new(names::FAVICONS, json!({ "logo": favicon })));
    }

    if env.is_production() {
        let base = resolve_output_path(settings, env, journey, brand)
            .map(|p| p.base())
            .unwrap_or_default();
        let scout = compose_scout_template(&template, &base, &settings.report_path());
        plugins.push(plugin(names::HTML_TEMPLATE, "scout template", &scout)?);

        let policy = env_settings
            .security
            .as_ref()
            .and_then(|s| s.content_security_policy.as_ref())
            .map(|csp| to_value("content security policy", &csp.content))
            .transpose()?
            .unwrap_or_else(|| json!({}));
        plugins.push(PluginSpec::new(
            names::CSP,
            json!({ "policy": policy, "hashingMethod": "sha256", "enabled": true }),
        ));

        let target = VersionTarget {
            file_path: version_file_path(&base, env_settings.no_hash),
            no_hash: env_settings.no_hash,
            journey: journey.to_string(),
            brand: brand.to_string(),
        };
        plugins.push(plugin(names::VERSION_TEMPLATE, "version target", &target)?);
    }

    plugins.extend(compose_define(settings, env, journey, brand));
    plugins.push(plugin(names::COPY, "copy patterns", &compose_copy(settings, env, journey))?);

    let entry = compose_entry(settings, env, journey, brand);
    if entry.is_empty() {
        tracing::warn!(env = %env, journey, brand, "journey declares no entries");
    }

    let layers = vec![
        static_layer(
            LayerOrigin::CommonDefaults,
            to_value("common rules", &common_rules(settings))?,
            to_value("common plugins", &common_plugins())?,
        ),
        static_layer(
            LayerOrigin::EnvironmentDefaults,
            to_value("environment rules", &environment_rules(settings, env))?,
            to_value("environment plugins", &environment_plugins(settings, env))?,
        ),
        MergeLayer::new(
            LayerOrigin::Composition,
            json!({
                "entry": to_value("entry", &entry)?,
                "output": to_value("output", &output)?,
                "plugins": to_value("plugins", &plugins)?,
            }),
        ),
        MergeLayer::new(
            LayerOrigin::Override,
            Value::Object(env_settings.bundler.clone()),
        ),
    ];

    let config = BuildConfiguration::from_layers(layers, journey, brand)?;
    tracing::debug!(
        env = %env,
        journey,
        brand,
        plugins = config.plugins.len(),
        rules = config.module.rules.len(),
        "composed build configuration"
    );
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"
        [environments.development.journeys.checkout]
        entry = { main = "src/main.js" }
        html_output = { file_name = "index.html", template = "index.html" }

        [environments.production]
        favicon = "assets/favicon.png"
        [environments.production.bundler]
        devtool = "source-map"
        [environments.production.bundler.output]
        publicPath = "https://cdn.example.com/"
        [[environments.production.bundler.plugins]]
        plugin = "BannerPlugin"
        [environments.production.journeys.checkout]
        entry = { main = "src/main.js", styles = "src/main.scss" }
        html_output = { file_name = "index.html", template = "index.html" }
    "#;

    fn settings() -> ProjectSettings {
        ProjectSettings::from_str(SETTINGS).unwrap()
    }

    fn plugin_names(config: &BuildConfiguration) -> Vec<&str> {
        config
            .plugins
            .iter()
            .filter_map(|p| p.get("plugin").and_then(Value::as_str))
            .collect()
    }

    #[test]
    fn test_development_plugin_order() {
        let config = compose_build_config(&settings(), Environment::Development, "checkout", "")
            .unwrap()
            .unwrap();
        assert_eq!(
            plugin_names(&config),
            vec![
                names::NAMED_MODULES,
                names::HOT_MODULE_REPLACEMENT,
                names::HTML_TEMPLATE,
                names::DEFINE,
                names::COPY,
            ]
        );
        assert_eq!(config.plugin_count(names::CSP), 0);
        assert!(config.version_target().is_none());
    }

    #[test]
    fn test_production_plugin_order() {
        let config = compose_build_config(&settings(), Environment::Production, "checkout", "")
            .unwrap()
            .unwrap();
        assert_eq!(
            plugin_names(&config),
            vec![
                names::SCRIPT_MINIFIER,
                names::CSS_EXTRACT,
                names::HTML_TEMPLATE,
                names::FAVICONS,
                names::HTML_TEMPLATE,
                names::CSP,
                names::VERSION_TEMPLATE,
                names::DEFINE,
                names::COPY,
                "BannerPlugin",
            ]
        );

        let target = config.version_target().unwrap();
        assert_eq!(target.file_path, "dist/checkout/version.[contenthash].json");
        assert_eq!(config.plugin_options(names::CSP).unwrap()["hashingMethod"], "sha256");
    }

    #[test]
    fn test_overrides_win() {
        let config = compose_build_config(&settings(), Environment::Production, "checkout", "")
            .unwrap()
            .unwrap();
        assert_eq!(config.output["publicPath"], "https://cdn.example.com/");
        assert_eq!(config.output["filename"], "[name].[chunkhash].js");
        assert_eq!(config.overrides["devtool"], "source-map");
    }

    #[test]
    fn test_entry_override_replaces_shape() {
        let toml = format!(
            "{}\n[environments.development.bundler]\nentry = \"./src/override.js\"\n",
            SETTINGS
        );
        let s = ProjectSettings::from_str(&toml).unwrap();
        let config = compose_build_config(&s, Environment::Development, "checkout", "")
            .unwrap()
            .unwrap();
        assert_eq!(config.entry, json!("./src/override.js"));
        assert!(config.entry_names().is_empty());
        assert!(!config.is_empty());
        // the rest of the composition is untouched
        assert_eq!(config.plugin_count(names::HTML_TEMPLATE), 1);
    }

    #[test]
    fn test_entry_override_merges_named_bundles() {
        let toml = format!(
            "{}\n[environments.development.bundler.entry]\npolyfills = \"./src/polyfills.js\"\n",
            SETTINGS
        );
        let s = ProjectSettings::from_str(&toml).unwrap();
        let config = compose_build_config(&s, Environment::Development, "checkout", "")
            .unwrap()
            .unwrap();
        assert_eq!(config.entry_names(), vec!["js/main", "polyfills"]);
        assert_eq!(config.entry_files("js/main").unwrap(), vec!["src/main.js"]);
        assert_eq!(config.entry_files("polyfills").unwrap(), vec!["./src/polyfills.js"]);
    }

    #[test]
    fn test_rules_concatenate() {
        let config = compose_build_config(&settings(), Environment::Development, "checkout", "")
            .unwrap()
            .unwrap();
        // three common rules followed by sass and less
        assert_eq!(config.module.rules.len(), 5);
    }

    #[test]
    fn test_unknown_tuple_is_none() {
        let s = settings();
        assert!(compose_build_config(&s, Environment::Test, "checkout", "").unwrap().is_none());
        assert!(compose_build_config(&s, Environment::Production, "missing", "").unwrap().is_none());
    }

    #[test]
    fn test_serialized_key_order() {
        let config = compose_build_config(&settings(), Environment::Production, "checkout", "")
            .unwrap()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let entry = json.find("\"entry\"").unwrap();
        let output = json.find("\"output\"").unwrap();
        let module = json.find("\"module\"").unwrap();
        let plugins = json.find("\"plugins\"").unwrap();
        assert!(entry < output && output < module && module < plugins);
    }
}
