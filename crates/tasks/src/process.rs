//! Spawning external commands.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{CommandSpec, TaskError};

/// Runs an external command to completion.
///
/// Abstracted so tests can record commands instead of spawning them.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `cwd`.  A non-zero exit is an error.
    async fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<(), TaskError>;
}

/// Spawns real processes with stdin, stdout and stderr inherited from the
/// task runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec, cwd: &Path) -> Result<(), TaskError> {
        info!("$ {command}");
        debug!("cwd: {}", cwd.display());

        let status = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| TaskError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(TaskError::CommandFailed {
                program: command.program.clone(),
                code: status.code(),
            })
        }
    }
}
