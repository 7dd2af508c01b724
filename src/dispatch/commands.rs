//! Shell command templates (`[commands]` in journeypack.toml)
//!
//! Templates use `{name}` placeholders and may chain several commands with
//! `&&`; each link becomes its own task.

use serde::{Deserialize, Serialize};

/// Command templates for every task the dispatcher can build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandTemplates {
    /// Development server. Placeholders: `{bin}`, `{settings}`, `{output}`,
    /// `{config}`.
    pub server: String,

    /// Development build. Placeholders: `{bin}`, `{settings}`, `{output}`,
    /// `{config}`.
    pub build: String,

    /// Production build. Placeholders: `{bin}`, `{settings}`, `{output}`,
    /// `{config}`.
    pub release: String,

    /// Base lint for one path. Placeholder: `{path}`.
    pub eslint: String,

    /// Test-source lint for one path. Placeholder: `{path}`.
    pub eslint_test: String,

    /// Stylesheet lint for one path. Placeholder: `{path}`.
    pub style_lint: String,

    /// Lint report for one path. Placeholders: `{path}`, `{config}`.
    pub eslint_report: String,

    /// Single test run. Placeholder: `{config}`.
    pub test: String,

    /// Test watcher on changed files. Placeholder: `{config}`.
    pub test_watch: String,

    /// Test watcher on all files. Placeholder: `{config}`.
    pub test_watch_all: String,

    /// Static server for a built bundle. Placeholders: `{path}`, `{port}`.
    pub scout: String,

    /// Mock API server. Placeholder: `{config}`.
    pub mock_server: String,

    /// Mock API server with file watching. Placeholder: `{config}`.
    pub mock_server_watch: String,

    /// Documentation generator. Placeholder: `{config}`.
    pub doc: String,
}

impl Default for CommandTemplates {
    fn default() -> Self {
        Self {
            server: "{bin} --config {settings} resolve --env development --out {output}/journeypack.development.json \
                     && webpack-dev-server --config {config} --hot"
                .to_string(),
            build: "rm -rf {output} \
                    && {bin} --config {settings} resolve --env development --out {output}/journeypack.development.json \
                    && webpack --config {config}"
                .to_string(),
            release: "rm -rf {output} \
                      && {bin} --config {settings} resolve --env production --out {output}/journeypack.production.json \
                      && webpack --config {config}"
                .to_string(),
            eslint: "eslint --ext .js,.jsx {path}".to_string(),
            eslint_test: "eslint --env jest --ext .js,.jsx {path}".to_string(),
            style_lint: "stylelint \"{path}\"".to_string(),
            eslint_report: "eslint -c {config} -f html -o reports/eslint.html --ext .js,.jsx {path}"
                .to_string(),
            test: "jest --config {config}".to_string(),
            test_watch: "jest --config {config} --watch".to_string(),
            test_watch_all: "jest --config {config} --watchAll".to_string(),
            scout: "http-server {path} -p {port}".to_string(),
            mock_server: "json-server {config}".to_string(),
            mock_server_watch: "json-server --watch {config}".to_string(),
            doc: "jsdoc -c {config}".to_string(),
        }
    }
}

/// Substitute `{name}` placeholders and split the result on `&&`.
///
/// Unknown placeholders are left untouched. Empty links are dropped.
pub fn render(template: &str, vars: &[(&str, &str)]) -> Vec<String> {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }

    rendered
        .split("&&")
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let commands = render("http-server {path} -p {port}", &[("path", "dist/checkout"), ("port", "8081")]);
        assert_eq!(commands, vec!["http-server dist/checkout -p 8081"]);
    }

    #[test]
    fn test_render_splits_chain() {
        let commands = render("rm -rf {output} && webpack", &[("output", "dist")]);
        assert_eq!(commands, vec!["rm -rf dist", "webpack"]);
    }

    #[test]
    fn test_default_release_chain() {
        let templates = CommandTemplates::default();
        let commands = render(
            &templates.release,
            &[
                ("bin", "journeypack"),
                ("settings", "journeypack.toml"),
                ("output", "dist"),
                ("config", "webpack.config.js"),
            ],
        );
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], "rm -rf dist");
        assert_eq!(
            commands[1],
            "journeypack --config journeypack.toml resolve --env production --out dist/journeypack.production.json"
        );
        assert_eq!(commands[2], "webpack --config webpack.config.js");
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let templates: CommandTemplates = toml::from_str(r#"scout = "serve {path} -l {port}""#).unwrap();
        assert_eq!(templates.scout, "serve {path} -l {port}");
        assert_eq!(templates.test, CommandTemplates::default().test);
    }
}
