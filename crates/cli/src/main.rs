//! `portal-tasks` CLI entry-point.
//!
//! Available sub-commands:
//! - `install`         install project dependencies.
//! - `run`             start the development server (the default).
//! - `build`           build the server binary.
//! - `init-db`         create the database and apply migrations.
//! - `seed`            insert sample words.
//! - `reset`           delete the database file.
//! - `reset-and-seed`  `reset`, `init-db` and `seed` in one go.
//! - `test-db`         rebuild the test database from fixtures.
//! - `list`            show every task and its dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use engine::{TaskExecutor, TaskRegistry, DEFAULT_TASK};
use tasks::builtin;
use tasks::config::CONFIG_FILE;
use tasks::{SystemRunner, TaskConfig, TaskContext};

#[derive(Parser)]
#[command(
    name = "portal-tasks",
    about = "Developer tasks for the lang portal backend",
    version
)]
struct Cli {
    /// Project root; configured paths are resolved against it.
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Config file [default: <dir>/Tasks.toml, if present].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the development database path.
    #[arg(long, global = true, env = "PORTAL_DATABASE")]
    database: Option<PathBuf>,

    /// Print the tasks that would run, without running them.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Install project dependencies.
    Install,
    /// Start the development server (runs `install` first).
    Run,
    /// Build the server binary (runs `install` first).
    Build,
    /// Create the database and apply pending migrations.
    InitDb,
    /// Insert sample words into the database.
    Seed,
    /// Delete the database file.
    Reset,
    /// Run `reset`, `init-db` and `seed`.
    ResetAndSeed,
    /// Rebuild the test database from the schema and fixture files.
    TestDb,
    /// List every task with its dependencies.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// The task this sub-command runs, if it runs one.
    fn task_name(&self) -> Option<&'static str> {
        match self {
            Self::Install => Some(builtin::INSTALL),
            Self::Run => Some(builtin::RUN),
            Self::Build => Some(builtin::BUILD),
            Self::InitDb => Some(builtin::INIT_DB),
            Self::Seed => Some(builtin::SEED),
            Self::Reset => Some(builtin::RESET),
            Self::ResetAndSeed => Some(builtin::RESET_AND_SEED),
            Self::TestDb => Some(builtin::TEST_DB),
            Self::List { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = TaskRegistry::with_builtins()?;

    if let Some(Command::List { json }) = &cli.command {
        return list(&registry, *json);
    }

    let target = cli
        .command
        .as_ref()
        .and_then(Command::task_name)
        .unwrap_or(DEFAULT_TASK);

    let config = load_config(&cli)?;
    let ctx = TaskContext::new(&cli.dir, config, Arc::new(SystemRunner));
    let executor = TaskExecutor::new(registry, ctx);

    if cli.dry_run {
        for name in executor.plan(target)? {
            println!("{name}");
        }
        return Ok(());
    }

    let report = executor.run(target).await?;
    info!(
        "Done: {} task(s) in {:.2?}",
        report.completed.len(),
        report.total_elapsed()
    );
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<TaskConfig> {
    if !cli.dir.is_dir() {
        anyhow::bail!("project directory '{}' does not exist", cli.dir.display());
    }

    let config = match &cli.config {
        Some(path) => TaskConfig::load(path)?,
        None => TaskConfig::load_or_default(&cli.dir.join(CONFIG_FILE))?,
    };
    match &cli.database {
        Some(database) => {
            debug!("Database overridden to {}", database.display());
            Ok(config.with_database(database.clone(), Path::new("--database"))?)
        }
        None => Ok(config),
    }
}

fn list(registry: &TaskRegistry, json: bool) -> anyhow::Result<()> {
    let definitions = registry.definitions();

    if json {
        let out = serde_json::to_string_pretty(&definitions).context("serialising task list")?;
        println!("{out}");
        return Ok(());
    }

    let width = definitions.iter().map(|d| d.name.len()).max().unwrap_or(0);
    for def in &definitions {
        let marker = if def.name == DEFAULT_TASK { " (default)" } else { "" };
        print!("{:<width$}  {}{}", def.name, def.description, marker);
        if !def.deps.is_empty() {
            print!(" [deps: {}]", def.deps.join(", "));
        }
        println!();
    }
    Ok(())
}
