//! Module transform rules per environment.
//!
//! The tables are static apart from the asset inlining limit and the PostCSS
//! configuration path, both read from the project settings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ProjectSettings;
use crate::environment::Environment;

/// Fallback loader used when stylesheet extraction is not available.
pub const STYLE_FALLBACK: &str = "style-loader";

/// A single loader in a rule's chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderSpec {
    pub loader: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl LoaderSpec {
    pub fn new(loader: impl Into<String>, options: Value) -> Self {
        Self {
            loader: loader.into(),
            options,
        }
    }

    pub fn bare(loader: impl Into<String>) -> Self {
        Self::new(loader, Value::Null)
    }
}

/// Loader chain routed through the stylesheet extraction plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractLoader {
    #[serde(rename = "use")]
    pub loaders: Vec<LoaderSpec>,
    pub fallback: String,
}

/// One module rule: a file pattern and the loaders applied to matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRule {
    /// File name pattern
    pub test: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(rename = "use", default, skip_serializing_if = "Vec::is_empty")]
    pub loaders: Vec<LoaderSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractLoader>,
}

impl ModuleRule {
    fn chain(test: &str, loaders: Vec<LoaderSpec>) -> Self {
        Self {
            test: test.to_string(),
            exclude: None,
            loaders,
            extract: None,
        }
    }

    fn extracted(test: &str, loaders: Vec<LoaderSpec>) -> Self {
        Self {
            test: test.to_string(),
            exclude: None,
            loaders: Vec::new(),
            extract: Some(ExtractLoader {
                loaders,
                fallback: STYLE_FALLBACK.to_string(),
            }),
        }
    }

    /// Every loader name this rule references, extraction chain included.
    pub fn loader_names(&self) -> Vec<&str> {
        let extracted = self.extract.iter().flat_map(|e| e.loaders.iter());
        self.loaders
            .iter()
            .chain(extracted)
            .map(|l| l.loader.as_str())
            .collect()
    }
}

const SASS_TEST: &str = r"\.(scss|sass)$";
const LESS_TEST: &str = r"\.less$";

/// Rules shared by every environment: script transpiling, font and image inlining.
pub fn common_rules(settings: &ProjectSettings) -> Vec<ModuleRule> {
    let limit = settings.assets_limit();
    let url_loader = |name: &str| {
        LoaderSpec::new("url-loader", json!({ "limit": limit, "name": name }))
    };

    vec![
        ModuleRule {
            exclude: Some("node_modules".to_string()),
            ..ModuleRule::chain(r"\.(js|jsx)$", vec![LoaderSpec::bare("babel-loader")])
        },
        ModuleRule::chain(
            r"\.(eot|svg|ttf|TTF|woff|woff2)$",
            vec![url_loader("fonts/[name].[ext]?[hash]")],
        ),
        ModuleRule::chain(
            r"\.(gif|jpg|jpe?g|png)$",
            vec![url_loader("img/[name].[ext]?[hash]")],
        ),
    ]
}

/// Environment-specific stylesheet rules, not including the common set.
/// `test` builds share the development rules.
pub fn environment_rules(settings: &ProjectSettings, env: Environment) -> Vec<ModuleRule> {
    match env {
        Environment::Development | Environment::Test => development_rules(settings),
        Environment::Production => production_rules(settings),
    }
}

fn postcss(settings: &ProjectSettings, source_map: bool) -> LoaderSpec {
    let mut options = json!({ "config": { "path": settings.postcss_config } });
    if source_map {
        options["sourceMap"] = json!(true);
    }
    LoaderSpec::new("postcss-loader", options)
}

fn less_paths(settings: &ProjectSettings) -> Value {
    json!([settings.project_root.display().to_string(), "node_modules"])
}

fn development_rules(settings: &ProjectSettings) -> Vec<ModuleRule> {
    let css = LoaderSpec::new("css-loader", json!({ "sourceMap": true, "importLoaders": 1 }));

    vec![
        ModuleRule::chain(
            SASS_TEST,
            vec![
                LoaderSpec::bare(STYLE_FALLBACK),
                css.clone(),
                LoaderSpec::bare("resolve-url-loader"),
                postcss(settings, true),
                LoaderSpec::new(
                    "sass-loader",
                    json!({ "includePaths": ["node_modules"], "sourceMap": true }),
                ),
            ],
        ),
        ModuleRule::chain(
            LESS_TEST,
            vec![
                LoaderSpec::bare(STYLE_FALLBACK),
                css,
                postcss(settings, true),
                LoaderSpec::new(
                    "less-loader",
                    json!({ "paths": less_paths(settings), "sourceMap": true }),
                ),
            ],
        ),
    ]
}

fn production_rules(settings: &ProjectSettings) -> Vec<ModuleRule> {
    vec![
        ModuleRule::extracted(
            SASS_TEST,
            vec![
                LoaderSpec::new("css-loader", json!({ "minimize": true })),
                LoaderSpec::bare("resolve-url-loader"),
                postcss(settings, true),
                LoaderSpec::new(
                    "sass-loader",
                    json!({
                        "includePaths": ["node_modules"],
                        "sourceMap": true,
                        "sourceMapContents": true
                    }),
                ),
            ],
        ),
        ModuleRule::extracted(
            LESS_TEST,
            vec![
                LoaderSpec::new("css-loader", json!({ "minimize": true, "importLoaders": 1 })),
                postcss(settings, false),
                LoaderSpec::new("less-loader", json!({ "paths": less_paths(settings) })),
            ],
        ),
    ]
}
