//! Shared settings fixtures for the integration tests.
//!
//! One storefront project: a branded `checkout` journey (red, blue), an
//! unbranded `account` journey, and a `landing` journey with no entries.

#![allow(dead_code)]

use journeypack::ProjectSettings;
use std::fs;
use tempfile::TempDir;

pub const SAMPLE_SETTINGS: &str = r##"
port = 8080
default_stylesheet = "src/styles/default.scss"

[lint]
configs = ["webpack.config.js"]
base = ["src"]
test = ["test"]
style = ["src/**/*.scss"]

[tools]
eslint = ".eslintrc.json"
test = "jest.config.js"
mock = "mock/db.json"
doc = "jsdoc.json"

# -----------------------------------------------------------------------------
# development
# -----------------------------------------------------------------------------

[environments.development]
brands = ["red", "blue"]

[environments.development.brand_properties.default]
title = "Storefront"
theme = { primary = "#000000" }

[environments.development.brand_properties.red]
theme = { primary = "#cc0000" }

[environments.development.journeys.checkout]
entry = { main = "src/checkout/index.js", styles = { red = "src/red.scss", blue = "src/blue.scss" } }
html_output = { file_name = "index.html", template = "src/checkout/index.html" }

[environments.development.journeys.landing]
html_output = { file_name = "index.html", template = "src/landing/index.html" }

# -----------------------------------------------------------------------------
# production
# -----------------------------------------------------------------------------

[environments.production]
brands = ["red", "blue"]
release_version = "2.3.0"
html_minify = { collapseWhitespace = true }

[environments.production.output]
root = "build"

[environments.production.brand_properties.default]
title = "Storefront"

[environments.production.security]
enabled = true

[environments.production.security.content_security_policy]
enabled = true
content = { default-src = "'self'", script-src = ["'self'", "%%nonce%%"] }

[environments.production.bundler]
devtool = "source-map"

[environments.production.bundler.output]
publicPath = "https://cdn.example.com/"

[environments.production.journeys.checkout]
entry = { vendor = ["react", "react-dom"], main = "src/checkout/index.js", styles = "src/checkout.scss" }
html_output = { file_name = "index.html", template = "src/checkout/index.html" }
copy = [{ from = "static/robots.txt", to = "robots.txt" }]

[environments.production.journeys.account]
no_brands = true
entry = { main = "src/account/index.js" }
html_output = { file_name = "account.html", template = "src/account/index.html" }

[environments.production.journeys.landing]
entry = {}
html_output = { file_name = "index.html", template = "src/landing/index.html" }
"##;

/// Parsed sample settings rooted at `.`.
pub fn sample_settings() -> ProjectSettings {
    ProjectSettings::from_str(SAMPLE_SETTINGS).expect("sample settings parse")
}

/// A project directory with the settings file and every tool config on disk.
pub fn sample_project() -> (TempDir, ProjectSettings) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let settings_path = dir.path().join("journeypack.toml");
    fs::write(&settings_path, SAMPLE_SETTINGS).expect("write settings");

    for tool in [".eslintrc.json", "jest.config.js", "mock/db.json", "jsdoc.json"] {
        let path = dir.path().join(tool);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create tool dir");
        }
        fs::write(path, "{}").expect("write tool config");
    }

    let settings = ProjectSettings::from_file(&settings_path).expect("load settings");
    (dir, settings)
}

/// Owned argument list.
pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
