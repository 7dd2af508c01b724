//! Verb dispatch tests
//!
//! Plans are checked with a recording runner; the last tests run real shell
//! commands through `ShellRunner` with command templates pointed at `echo`.

mod fixtures;

use fixtures::{args, sample_project, sample_settings};
use journeypack::dispatch::{CommandTask, EXIT_PRECONDITION};
use journeypack::{
    DispatchError, DispatchState, Dispatcher, Environment, ProjectSettings, ShellRunner, TaskRunner,
};
use std::fs;

/// Records every task and fails the one at `fail_at` (0-based).
#[derive(Default)]
struct RecordingRunner {
    ran: Vec<CommandTask>,
    fail_at: Option<usize>,
}

impl RecordingRunner {
    fn failing_at(idx: usize) -> Self {
        Self {
            ran: Vec::new(),
            fail_at: Some(idx),
        }
    }
}

impl TaskRunner for RecordingRunner {
    fn run(&mut self, task: &CommandTask) -> Result<(), DispatchError> {
        let idx = self.ran.len();
        self.ran.push(task.clone());
        if self.fail_at == Some(idx) {
            return Err(DispatchError::TaskFailed {
                command: task.command.clone(),
                message: task.message.clone(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Lint
// =============================================================================

#[test]
fn test_lint_without_scope_runs_four_scopes_in_order() {
    let settings = sample_settings();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    let report = dispatcher.dispatch(&args(&["-l"])).unwrap();

    assert_eq!(report.planned, 4);
    let commands: Vec<&str> = dispatcher.runner().ran.iter().map(|t| t.command.as_str()).collect();
    assert_eq!(
        commands,
        vec![
            "eslint --ext .js,.jsx webpack.config.js",
            "eslint --ext .js,.jsx src",
            "eslint --env jest --ext .js,.jsx test",
            "stylelint \"src/**/*.scss\"",
        ]
    );
}

#[test]
fn test_lint_failure_stops_remaining_tasks() {
    let settings = sample_settings();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::failing_at(1));
    let err = dispatcher.dispatch(&args(&["--lint"])).unwrap_err();

    assert!(matches!(err, DispatchError::TaskFailed { .. }));
    assert_eq!(dispatcher.state(), DispatchState::Failed);
    // configs ran, base failed, test and style never started
    assert_eq!(dispatcher.runner().ran.len(), 2);
    assert!(dispatcher.runner().ran[1].message.contains("base"));
}

#[test]
fn test_lint_unknown_scope_is_a_precondition() {
    let settings = sample_settings();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    let err = dispatcher.dispatch(&args(&["-s", "-l", "docs"])).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_PRECONDITION);
    assert!(dispatcher.runner().ran.is_empty());
}

// =============================================================================
// Scout
// =============================================================================

#[test]
fn test_scout_splits_target_and_bumps_port() {
    let settings = sample_settings();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    dispatcher.dispatch(&args(&["--scout", "checkout~blue"])).unwrap();

    let ran = &dispatcher.runner().ran;
    assert_eq!(ran.len(), 1);
    assert_eq!(ran[0].command, "http-server build/checkout/blue -p 8081");
}

#[test]
fn test_scout_rejects_malformed_target() {
    let settings = sample_settings();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    let err = dispatcher.dispatch(&args(&["-c", "~blue"])).unwrap_err();
    assert!(matches!(err, DispatchError::Precondition { .. }));
}

// =============================================================================
// Ordering, modes and preconditions
// =============================================================================

#[test]
fn test_tasks_follow_flag_order() {
    let (_dir, settings) = sample_project();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    dispatcher
        .dispatch(&args(&["-d", "--unknown", "-t", "watch", "-m", "-b", "production"]))
        .unwrap();

    let ran = &dispatcher.runner().ran;
    assert_eq!(ran[0].command, "jsdoc -c jsdoc.json");
    assert_eq!(ran[1].command, "jest --config jest.config.js --watch");
    assert_eq!(ran[1].mode, Some(Environment::Test));
    assert_eq!(ran[2].command, "json-server mock/db.json");
    assert_eq!(ran[3].command, "rm -rf build");
    assert!(ran[3..].iter().all(|t| t.mode == Some(Environment::Production)));
    assert_eq!(ran.len(), 6);
}

#[test]
fn test_missing_tool_file_fails_before_any_task() {
    // settings name the tools, but nothing exists on disk
    let settings = sample_settings().with_project_root("/nonexistent/journeypack");
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    let err = dispatcher.dispatch(&args(&["-l", "-r"])).unwrap_err();

    assert!(err.to_string().contains("checkStyle"));
    assert!(dispatcher.runner().ran.is_empty());
}

#[test]
fn test_no_args_is_a_no_op() {
    let settings = sample_settings();
    let mut dispatcher = Dispatcher::new(&settings, RecordingRunner::default());
    let report = dispatcher.dispatch(&args(&["positional"])).unwrap();
    assert_eq!(report.planned, 0);
    assert_eq!(dispatcher.state(), DispatchState::Done);
}

// =============================================================================
// Shell execution
// =============================================================================

fn echo_settings(root: &std::path::Path) -> ProjectSettings {
    ProjectSettings::from_str(
        r#"
        [lint]
        configs = ["one"]
        base = ["two"]
        test = ["three"]
        style = ["four"]

        [commands]
        eslint = "echo {path} >> lint.log"
        eslint_test = "exit 4"
        style_lint = "echo {path} >> lint.log"
        "#,
    )
    .unwrap()
    .with_project_root(root)
}

#[test]
fn test_shell_runner_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let settings = echo_settings(dir.path());
    let mut dispatcher = Dispatcher::new(&settings, ShellRunner::new(dir.path()));

    let err = dispatcher.dispatch(&args(&["-l"])).unwrap_err();
    assert_eq!(err.exit_code(), 4);

    let log = fs::read_to_string(dir.path().join("lint.log")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), vec!["one", "two"]);
}
