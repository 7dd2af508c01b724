//! Task builders, one per verb.
//!
//! Builders only read settings and check preconditions; nothing here spawns
//! a process.

use std::path::Path;

use journeypack_options::{ScoutTarget, Verb, VerbInvocation};
use serde::{Deserialize, Serialize};

use super::commands::render;
use super::DispatchError;
use crate::config::{BuiltinDefaults, ProjectSettings, LINT_SCOPES};
use crate::environment::Environment;
use crate::paths::journey_brand_path;

/// Lint value selecting every scope.
pub const ALL_SCOPES: &str = "all";

/// Mock server value selecting the watching server.
pub const MOCK_WATCH: &str = "watch";

/// One external command and its status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTask {
    pub command: String,
    pub message: String,

    /// Execution mode exported to the spawned process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Environment>,
}

impl CommandTask {
    pub fn new(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            message: message.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: Environment) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Inputs shared by every builder.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    pub settings: &'a ProjectSettings,

    /// Path of this executable, for `{bin}`
    pub bin: &'a str,

    /// Settings file handed back to `{bin}`, for `{settings}`
    pub settings_file: &'a Path,
}

/// Build the tasks for one verb invocation.
pub fn build_tasks(
    ctx: &TaskContext<'_>,
    invocation: &VerbInvocation,
) -> Result<Vec<CommandTask>, DispatchError> {
    let value = invocation.value.as_deref();
    match invocation.verb {
        Verb::Server => Ok(server_tasks(ctx)),
        Verb::Build => Ok(build_bundle_tasks(ctx, value)),
        Verb::Lint => lint_tasks(ctx.settings, value),
        Verb::Test => test_tasks(ctx.settings, value),
        Verb::Scout => scout_tasks(ctx.settings, value).map(|task| vec![task]),
        Verb::MockServer => mock_server_tasks(ctx.settings, value).map(|task| vec![task]),
        Verb::CheckStyle => check_style_tasks(ctx.settings).map(|task| vec![task]),
        Verb::Doc => doc_tasks(ctx.settings).map(|task| vec![task]),
    }
}

fn precondition(task: Verb, message: impl Into<String>) -> DispatchError {
    DispatchError::Precondition {
        task,
        message: message.into(),
    }
}

/// Config file of a tool, which must be set and exist under the project root.
fn require_tool<'a>(
    settings: &ProjectSettings,
    task: Verb,
    tool: &str,
    file: Option<&'a String>,
) -> Result<&'a str, DispatchError> {
    let Some(file) = file.filter(|f| !f.trim().is_empty()) else {
        return Err(precondition(
            task,
            format!("{} is not configured, set tools.{} in the settings file", tool, tool),
        ));
    };
    if !settings.resolve_path(file).exists() {
        return Err(precondition(
            task,
            format!("{} config file {} does not exist", tool, file),
        ));
    }
    Ok(file.as_str())
}

fn output_root(settings: &ProjectSettings, env: Environment) -> String {
    settings
        .environment(env)
        .map(|e| e.output.root.clone())
        .unwrap_or_else(|| BuiltinDefaults::default().output_root)
}

/// Render a chained template into one task per link.
fn chain(template: &str, vars: &[(&str, &str)], message: &str, mode: Environment) -> Vec<CommandTask> {
    let commands = render(template, vars);
    let total = commands.len();
    commands
        .into_iter()
        .enumerate()
        .map(|(idx, command)| {
            CommandTask::new(command, format!("{} ({}/{})", message, idx + 1, total)).with_mode(mode)
        })
        .collect()
}

fn bundle_vars<'a>(
    ctx: &'a TaskContext<'_>,
    settings_file: &'a str,
    output: &'a str,
) -> [(&'a str, &'a str); 4] {
    [
        ("bin", ctx.bin),
        ("settings", settings_file),
        ("output", output),
        ("config", ctx.settings.bundler_config.as_str()),
    ]
}

fn server_tasks(ctx: &TaskContext<'_>) -> Vec<CommandTask> {
    let env = Environment::Development;
    let output = output_root(ctx.settings, env);
    let settings_file = ctx.settings_file.display().to_string();
    chain(
        &ctx.settings.commands.server,
        &bundle_vars(ctx, &settings_file, &output),
        "Starting development server",
        env,
    )
}

/// `-b production` builds for production; any other value builds for development.
fn build_bundle_tasks(ctx: &TaskContext<'_>, value: Option<&str>) -> Vec<CommandTask> {
    let env = match value.map(str::parse::<Environment>) {
        Some(Ok(Environment::Production)) => Environment::Production,
        _ => Environment::Development,
    };
    let template = if env.is_production() {
        &ctx.settings.commands.release
    } else {
        &ctx.settings.commands.build
    };
    let output = output_root(ctx.settings, env);
    let settings_file = ctx.settings_file.display().to_string();
    chain(
        template,
        &bundle_vars(ctx, &settings_file, &output),
        &format!("Building {} bundle", env),
        env,
    )
}

fn lint_tasks(settings: &ProjectSettings, value: Option<&str>) -> Result<Vec<CommandTask>, DispatchError> {
    let sweep = matches!(value, None | Some(ALL_SCOPES));
    let scopes: Vec<&str> = match value {
        Some(scope) if !sweep => vec![scope],
        _ => LINT_SCOPES.to_vec(),
    };

    let mut tasks = Vec::new();
    for scope in scopes {
        let Some(paths) = settings.lint.scope(scope) else {
            return Err(precondition(
                Verb::Lint,
                format!("unknown lint scope '{}', use one of: {}", scope, LINT_SCOPES.join(", ")),
            ));
        };
        if paths.is_empty() && !sweep {
            return Err(precondition(
                Verb::Lint,
                format!("lint scope '{}' has no paths configured", scope),
            ));
        }

        let template = match scope {
            "test" => &settings.commands.eslint_test,
            "style" => &settings.commands.style_lint,
            _ => &settings.commands.eslint,
        };
        for path in paths {
            for command in render(template, &[("path", path.as_str())]) {
                tasks.push(CommandTask::new(command, format!("Linting {}: {}", scope, path)));
            }
        }
    }

    if tasks.is_empty() {
        return Err(precondition(Verb::Lint, "no lint paths configured"));
    }
    Ok(tasks)
}

fn test_tasks(settings: &ProjectSettings, value: Option<&str>) -> Result<Vec<CommandTask>, DispatchError> {
    let config = require_tool(settings, Verb::Test, "test", settings.tools.test.as_ref())?;
    let (template, label) = match value {
        Some("watch") => (&settings.commands.test_watch, "watch"),
        Some("watchAll") => (&settings.commands.test_watch_all, "watchAll"),
        _ => (&settings.commands.test, "unit"),
    };
    Ok(chain(
        template,
        &[("config", config)],
        &format!("Running {} tests", label),
        Environment::Test,
    ))
}

fn scout_tasks(settings: &ProjectSettings, value: Option<&str>) -> Result<CommandTask, DispatchError> {
    let Some(raw) = value else {
        return Err(precondition(Verb::Scout, "expected a journey~brand target"));
    };
    let target = raw
        .parse::<ScoutTarget>()
        .map_err(|e| precondition(Verb::Scout, e.to_string()))?;

    // reports listen one above the development server
    let port = settings.port.checked_add(1).ok_or_else(|| {
        precondition(Verb::Scout, format!("port {} leaves no room for reports", settings.port))
    })?;

    let main_path = journey_brand_path(
        settings.journeys_enabled,
        &target.journey,
        target.brand_or_empty(),
    );
    let root = output_root(settings, Environment::Production);
    let bundle_path = if main_path.is_empty() {
        root
    } else {
        format!("{}/{}", root.trim_end_matches('/'), main_path)
    };

    let port = port.to_string();
    let command = render(
        &settings.commands.scout,
        &[("path", bundle_path.as_str()), ("port", port.as_str())],
    )
    .join(" && ");
    Ok(CommandTask::new(
        command,
        format!("Serving {} on port {}", bundle_path, port),
    ))
}

fn mock_server_tasks(settings: &ProjectSettings, value: Option<&str>) -> Result<CommandTask, DispatchError> {
    let config = require_tool(settings, Verb::MockServer, "mock", settings.tools.mock.as_ref())?;
    let template = if value == Some(MOCK_WATCH) {
        &settings.commands.mock_server_watch
    } else {
        &settings.commands.mock_server
    };
    Ok(CommandTask::new(
        render(template, &[("config", config)]).join(" && "),
        "Starting mock server",
    ))
}

fn check_style_tasks(settings: &ProjectSettings) -> Result<CommandTask, DispatchError> {
    let config = require_tool(settings, Verb::CheckStyle, "eslint", settings.tools.eslint.as_ref())?;
    let Some(path) = settings.lint.base.first() else {
        return Err(precondition(Verb::CheckStyle, "lint.base has no paths configured"));
    };
    Ok(CommandTask::new(
        render(
            &settings.commands.eslint_report,
            &[("path", path.as_str()), ("config", config)],
        )
        .join(" && "),
        format!("Writing lint report for {}", path),
    ))
}

fn doc_tasks(settings: &ProjectSettings) -> Result<CommandTask, DispatchError> {
    let config = require_tool(settings, Verb::Doc, "doc", settings.tools.doc.as_ref())?;
    Ok(CommandTask::new(
        render(&settings.commands.doc, &[("config", config)]).join(" && "),
        "Generating documentation",
    ))
}
