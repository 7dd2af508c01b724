//! Built-in project defaults
//!
//! Hardcoded fallbacks for every value the settings file may leave unset.

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Base port of the development server (default: 8080)
    pub port: u16,

    /// Asset inlining size limit in bytes (default: 100000)
    pub assets_bundle_limit: u64,

    /// Output root directory (default: "dist")
    pub output_root: String,

    /// Directory for script bundles inside the output (default: "js")
    pub scripts_dir: String,

    /// Directory for extracted stylesheets inside the output (default: "css")
    pub styles_dir: String,

    /// Public path prefix for emitted assets (default: "/")
    pub public_path: String,

    /// Fixed path reporting tooling serves from (default: "/release/")
    pub report_path: String,

    /// Version file stem (default: "version")
    pub version_file: String,

    /// HTML output file name for report templates (default: "index.html")
    pub html_file_name: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            port: 8080,
            assets_bundle_limit: 100_000,
            output_root: "dist".to_string(),
            scripts_dir: "js".to_string(),
            styles_dir: "css".to_string(),
            public_path: "/".to_string(),
            report_path: "/release/".to_string(),
            version_file: "version".to_string(),
            html_file_name: "index.html".to_string(),
        }
    }
}
