//! Brand fan-out
//!
//! A journey builds once per declared brand, or once unbranded when it opts
//! out of brands or the environment declares none.

use crate::config::ProjectSettings;
use crate::environment::Environment;
use crate::pipeline::{compose_build_config, BuildConfiguration, ComposeError};

/// Brands a journey builds for, in declaration order. An empty string stands
/// for the unbranded build. Unknown journeys build for no brand at all.
pub fn brands_for(settings: &ProjectSettings, env: Environment, journey: &str) -> Vec<String> {
    let Some(config) = settings.journey(env, journey) else {
        return Vec::new();
    };
    let declared = settings
        .environment(env)
        .map(|e| e.brands.clone())
        .unwrap_or_default();

    if config.no_brands || declared.is_empty() {
        vec![String::new()]
    } else {
        declared
    }
}

/// Build configurations for every brand of a journey.
pub fn resolve_brands(
    settings: &ProjectSettings,
    env: Environment,
    journey: &str,
) -> Result<Vec<BuildConfiguration>, ComposeError> {
    let brands = brands_for(settings, env, journey);
    if brands.is_empty() {
        tracing::debug!(env = %env, journey, "journey not configured, nothing to build");
        return Ok(Vec::new());
    }

    let mut configs = Vec::with_capacity(brands.len());
    for brand in &brands {
        if let Some(config) = compose_build_config(settings, env, journey, brand)? {
            configs.push(config);
        }
    }

    tracing::info!(env = %env, journey, brands = configs.len(), "resolved brand configurations");
    Ok(configs)
}

/// Build configurations for every journey of an environment, journeys in
/// name order and brands in declaration order.
pub fn resolve_all(
    settings: &ProjectSettings,
    env: Environment,
) -> Result<Vec<BuildConfiguration>, ComposeError> {
    let mut configs = Vec::new();
    for journey in settings.journey_names(env) {
        configs.extend(resolve_brands(settings, env, journey)?);
    }
    Ok(configs)
}
