//! Verb dispatch
//!
//! Turns raw verb flags into an execution plan and runs it:
//! `Idle -> OptionsParsed -> Validated -> Executing -> Done | Failed`.
//!
//! The whole plan is built and validated before the first process starts,
//! so a precondition failure never leaves a half-run plan behind. Tasks run
//! one at a time and the first failure aborts the rest.

pub mod commands;
pub mod runner;
pub mod tasks;

use std::io;
use std::path::{Path, PathBuf};

use journeypack_options::{extract_options, parse_invocations, Verb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ProjectSettings, DEFAULT_SETTINGS_FILE};

pub use commands::{render, CommandTemplates};
pub use runner::{ShellRunner, TaskRunner};
pub use tasks::{build_tasks, CommandTask, TaskContext};

/// Exit code for a failed precondition.
pub const EXIT_PRECONDITION: i32 = 2;

/// Exit code when a task could not be started.
pub const EXIT_SPAWN: i32 = 127;

/// Dispatch errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{task}: {message}")]
    Precondition { task: Verb, message: String },

    #[error(
        "{message} failed: `{command}` exited with {}",
        .code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c))
    )]
    TaskFailed {
        command: String,
        message: String,
        code: Option<i32>,
    },

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl DispatchError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::Precondition { .. } => EXIT_PRECONDITION,
            DispatchError::TaskFailed { code, .. } => code.filter(|c| *c != 0).unwrap_or(1),
            DispatchError::Spawn { .. } => EXIT_SPAWN,
        }
    }
}

/// Dispatch state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    Idle,
    OptionsParsed,
    Validated,
    Executing,
    Done,
    Failed,
}

impl DispatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchState::Done | DispatchState::Failed)
    }
}

/// Outcome of a finished dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub state: DispatchState,
    pub planned: usize,
    pub completed: usize,
}

/// Plans and runs verb flags against the project settings.
pub struct Dispatcher<'a, R: TaskRunner> {
    settings: &'a ProjectSettings,
    runner: R,
    bin: String,
    settings_file: PathBuf,
    state: DispatchState,
}

impl<'a, R: TaskRunner> Dispatcher<'a, R> {
    pub fn new(settings: &'a ProjectSettings, runner: R) -> Self {
        Self {
            settings,
            runner,
            bin: env!("CARGO_PKG_NAME").to_string(),
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            state: DispatchState::Idle,
        }
    }

    /// Executable substituted for `{bin}`.
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Settings file substituted for `{settings}`.
    pub fn with_settings_file(mut self, path: &Path) -> Self {
        self.settings_file = path.to_path_buf();
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn transition(&mut self, next: DispatchState) {
        tracing::debug!(from = ?self.state, to = ?next, "dispatch state");
        self.state = next;
    }

    /// Parse and validate the arguments into an ordered plan.
    pub fn plan(&mut self, args: &[String]) -> Result<Vec<CommandTask>, DispatchError> {
        let options = extract_options(args);
        let invocations = parse_invocations(args);
        tracing::debug!(
            options = options.len(),
            recognised = invocations.len(),
            "parsed verb flags"
        );
        self.transition(DispatchState::OptionsParsed);

        let ctx = TaskContext {
            settings: self.settings,
            bin: &self.bin,
            settings_file: &self.settings_file,
        };

        let built: Result<Vec<Vec<CommandTask>>, DispatchError> = invocations
            .iter()
            .map(|invocation| build_tasks(&ctx, invocation))
            .collect();

        match built {
            Ok(groups) => {
                self.transition(DispatchState::Validated);
                Ok(groups.into_iter().flatten().collect())
            }
            Err(err) => {
                self.transition(DispatchState::Failed);
                Err(err)
            }
        }
    }

    /// Plan and run. An argument list without recognised verbs is a no-op.
    pub fn dispatch(&mut self, args: &[String]) -> Result<DispatchReport, DispatchError> {
        let plan = self.plan(args)?;
        let planned = plan.len();

        self.transition(DispatchState::Executing);
        for (idx, task) in plan.iter().enumerate() {
            tracing::info!(step = idx + 1, of = planned, command = %task.command, "{}", task.message);
            if let Err(err) = self.runner.run(task) {
                tracing::error!(command = %task.command, error = %err, "task failed, aborting");
                self.transition(DispatchState::Failed);
                return Err(err);
            }
        }

        self.transition(DispatchState::Done);
        Ok(DispatchReport {
            state: self.state,
            planned,
            completed: planned,
        })
    }
}
