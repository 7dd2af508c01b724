//! Task execution.

use std::path::PathBuf;
use std::process::Command;

use super::tasks::CommandTask;
use super::DispatchError;

/// Executes one task to completion.
pub trait TaskRunner {
    fn run(&mut self, task: &CommandTask) -> Result<(), DispatchError>;
}

/// Runs tasks through `sh -c` in the project root, exporting the task's
/// execution mode as `NODE_ENV` and `BABEL_ENV` on the child only.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    working_dir: PathBuf,
}

impl ShellRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    fn command(&self, task: &CommandTask) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&task.command).current_dir(&self.working_dir);
        if let Some(mode) = task.mode {
            cmd.env("NODE_ENV", mode.as_str()).env("BABEL_ENV", mode.as_str());
        }
        cmd
    }
}

impl TaskRunner for ShellRunner {
    fn run(&mut self, task: &CommandTask) -> Result<(), DispatchError> {
        let status = self
            .command(task)
            .status()
            .map_err(|source| DispatchError::Spawn {
                command: task.command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DispatchError::TaskFailed {
                command: task.command.clone(),
                message: task.message.clone(),
                code: status.code(),
            })
        }
    }
}
