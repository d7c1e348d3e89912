//! Tasks that shell out to the server's toolchain.

use async_trait::async_trait;
use tracing::info;

use super::{BUILD, INSTALL, RUN};
use crate::{ExecutableTask, TaskContext, TaskDefinition, TaskError};

/// Installs project dependencies.
pub struct Install;

#[async_trait]
impl ExecutableTask for Install {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(INSTALL, "Install project dependencies")
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Installing dependencies...");
        ctx.runner.run(&ctx.config.commands.install, &ctx.root).await
    }
}

/// Starts the development server in the foreground.
pub struct Run;

#[async_trait]
impl ExecutableTask for Run {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(RUN, "Start the development server").with_deps(&[INSTALL])
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Starting server on {}", ctx.config.server_url);
        ctx.runner.run(&ctx.config.commands.run, &ctx.root).await?;
        info!("Server exited");
        Ok(())
    }
}

/// Builds the server binary.
pub struct Build;

#[async_trait]
impl ExecutableTask for Build {
    fn definition(&self) -> TaskDefinition {
        TaskDefinition::new(BUILD, "Build the server binary").with_deps(&[INSTALL])
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!("Building...");
        ctx.runner.run(&ctx.config.commands.build, &ctx.root).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mock::{mock_context, MockRunner};

    #[tokio::test]
    async fn install_runs_configured_command_in_root() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(MockRunner::new());
        let ctx = mock_context(dir.path(), runner.clone());

        Install.execute(&ctx).await.unwrap();

        assert_eq!(runner.command_lines(), vec!["cargo fetch"]);
        assert_eq!(runner.calls.lock().unwrap()[0].1, dir.path());
    }

    #[tokio::test]
    async fn run_and_build_use_their_own_commands() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(MockRunner::new());
        let ctx = mock_context(dir.path(), runner.clone());

        Run.execute(&ctx).await.unwrap();
        Build.execute(&ctx).await.unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["cargo run --bin server", "cargo build --release --bin server"]
        );
    }

    #[tokio::test]
    async fn failing_command_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(MockRunner::failing_on("cargo"));
        let ctx = mock_context(dir.path(), runner);

        let err = Build.execute(&ctx).await.unwrap_err();
        assert!(matches!(err, TaskError::CommandFailed { code: Some(1), .. }));
    }

    #[test]
    fn run_and_build_depend_on_install() {
        assert_eq!(Run.definition().deps, vec![INSTALL]);
        assert_eq!(Build.definition().deps, vec![INSTALL]);
        assert!(Install.definition().deps.is_empty());
    }
}
