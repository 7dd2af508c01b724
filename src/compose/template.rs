//! HTML template descriptors and compile-time constants.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::{BuiltinDefaults, ProjectSettings};
use crate::environment::Environment;
use crate::paths::journey_brand_path;
use crate::plugins::{names, PluginSpec};

/// Options of one HTML template plugin instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub filename: String,
    pub template: String,
    pub props: Value,
    pub inject: bool,
    pub minify: Value,
}

/// Base path the application is served under: the journey/brand path in
/// development, the site root otherwise.
pub fn base_path(settings: &ProjectSettings, env: Environment, journey: &str, brand: &str) -> String {
    if env.is_development() {
        format!("{}/", journey_brand_path(settings.journeys_enabled, journey, brand))
    } else {
        "/".to_string()
    }
}

/// Brand properties with `extra` keys set on top.
fn brand_props(
    settings: &ProjectSettings,
    env: Environment,
    brand: &str,
    extra: Vec<(&str, Value)>,
) -> Value {
    let mut props = match settings.environment(env).map(|e| e.brand_properties_for(brand)) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in extra {
        props.insert(key.to_string(), value);
    }
    Value::Object(props)
}

/// Compose the main HTML template for a tuple. `None` for an unknown journey.
pub fn compose_template(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
    brand: &str,
) -> Option<TemplateDescriptor> {
    let config = settings.journey(env, journey)?;
    let env_settings = settings.environment(env)?;

    let security = env_settings
        .security
        .as_ref()
        .and_then(|s| serde_json::to_value(s).ok())
        .unwrap_or_else(|| json!({}));

    let props = brand_props(
        settings,
        env,
        brand,
        vec![
            ("basePath", Value::String(base_path(settings, env, journey, brand))),
            ("env", Value::String(env.to_string())),
            ("security", security),
        ],
    );

    Some(TemplateDescriptor {
        filename: config.html_output.file_name.clone(),
        template: settings
            .resolve_path(&config.html_output.template)
            .display()
            .to_string(),
        props,
        inject: env_settings.inject,
        minify: env_settings.html_minify.clone().unwrap_or(Value::Bool(false)),
    })
}

/// Restricted template served by report and versioning tooling.
pub fn compose_scout_template(
    template: &TemplateDescriptor,
    base_output_path: &str,
    report_path: &str,
) -> TemplateDescriptor {
    let mut props = match &template.props {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    props.insert("scoutpath".to_string(), Value::String(report_path.to_string()));

    let name = if template.filename.is_empty() {
        BuiltinDefaults::default().html_file_name
    } else {
        template.filename.clone()
    };
    let filename = if base_output_path.is_empty() {
        name
    } else {
        format!("{}/{}", base_output_path, name)
    };

    TemplateDescriptor {
        filename,
        props: Value::Object(props),
        ..template.clone()
    }
}

/// Compile-time constants: the serialised brand properties under `webpack`,
/// plus `process.env.BRAND` and `process.env.NODE_ENV`.
pub fn compose_define(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
    brand: &str,
) -> Option<PluginSpec> {
    settings.journey(env, journey)?;

    let props = brand_props(
        settings,
        env,
        brand,
        vec![("basePath", Value::String(base_path(settings, env, journey, brand)))],
    );

    Some(PluginSpec::new(
        names::DEFINE,
        json!({
            "webpack": props.to_string(),
            "process.env": {
                "BRAND": Value::String(brand.to_string()).to_string(),
                "NODE_ENV": Value::String(env.to_string()).to_string(),
            }
        }),
    ))
}
