//! `Tasks.toml` configuration.
//!
//! Every key is optional.  A missing file means "all defaults".

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::TaskError;

/// File name looked up in the project root when no `--config` is given.
pub const CONFIG_FILE: &str = "Tasks.toml";

/// An external command: program plus arguments, no shell involved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Commands used by `install`, `run` and `build`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Commands {
    pub install: CommandSpec,
    pub run: CommandSpec,
    pub build: CommandSpec,
}

impl Default for Commands {
    fn default() -> Self {
        Self {
            install: CommandSpec::new("cargo", &["fetch"]),
            run: CommandSpec::new("cargo", &["run", "--bin", "server"]),
            build: CommandSpec::new("cargo", &["build", "--release", "--bin", "server"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    /// Development database used by `init-db`, `seed` and `reset`.
    pub database: PathBuf,
    /// Database rebuilt from scratch by `test-db`.
    pub test_database: PathBuf,
    /// Directory scanned for `*.sql` migrations by `init-db`.
    pub migrations_dir: PathBuf,
    /// Schema script executed by `test-db`.
    pub test_schema: PathBuf,
    /// Fixture rows executed by `test-db` after the schema.
    pub test_fixtures: PathBuf,
    /// Only used for the startup banner of `run`.
    pub server_url: String,
    pub commands: Commands,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("words.db"),
            test_database: PathBuf::from("words.test.db"),
            migrations_dir: PathBuf::from("db/migrations"),
            test_schema: PathBuf::from("db/migrations/001_initial_schema.sql"),
            test_fixtures: PathBuf::from("db/test_data.sql"),
            server_url: "http://localhost:8081".into(),
            commands: Commands::default(),
        }
    }
}

impl TaskConfig {
    /// Load and validate the config file at `path`, which must exist.
    pub fn load(path: &Path) -> Result<Self, TaskError> {
        let content = std::fs::read_to_string(path).map_err(|source| TaskError::Io {
            context: "failed to read config",
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Like [`TaskConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, TaskError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace the development database path, re-checking the result.
    ///
    /// `origin` names where the override came from in error messages.
    pub fn with_database(mut self, database: PathBuf, origin: &Path) -> Result<Self, TaskError> {
        self.database = database;
        self.validate(origin)?;
        Ok(self)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, TaskError> {
        let config: TaskConfig = toml::from_str(content).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), TaskError> {
        let invalid = |message: &str| TaskError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        for (name, command) in [
            ("install", &self.commands.install),
            ("run", &self.commands.run),
            ("build", &self.commands.build),
        ] {
            if command.program.trim().is_empty() {
                return Err(invalid(&format!("commands.{name}.program cannot be empty")));
            }
        }
        if self.database.as_os_str().is_empty() || self.test_database.as_os_str().is_empty() {
            return Err(invalid("database paths cannot be empty"));
        }
        if same_path(&self.database, &self.test_database) {
            return Err(invalid("database and test_database must differ"));
        }
        Ok(())
    }
}

/// Compare two configured paths, ignoring `.` components.
fn same_path(a: &Path, b: &Path) -> bool {
    let significant = |path: &Path| {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<PathBuf>()
    };
    significant(a) == significant(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<TaskConfig, TaskError> {
        TaskConfig::parse(content, Path::new("Tasks.toml"))
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse("").unwrap(), TaskConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = parse(
            r#"
            database = "data/dev.db"

            [commands]
            install = { program = "go", args = ["mod", "tidy"] }
            "#,
        )
        .unwrap();

        assert_eq!(config.database, PathBuf::from("data/dev.db"));
        assert_eq!(config.test_database, PathBuf::from("words.test.db"));
        assert_eq!(config.commands.install.to_string(), "go mod tidy");
        assert_eq!(config.commands.run, Commands::default().run);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse("databse = \"typo.db\"").unwrap_err();
        assert!(matches!(err, TaskError::Config { .. }));
        assert!(err.to_string().contains("databse"));
    }

    #[test]
    fn empty_program_is_rejected() {
        let err = parse("[commands]\nbuild = { program = \"\" }").unwrap_err();
        assert!(err.to_string().contains("commands.build.program"));
    }

    #[test]
    fn identical_databases_are_rejected() {
        let err = parse("database = \"a.db\"\ntest_database = \"a.db\"").unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn identical_databases_spelled_differently_are_rejected() {
        let err = parse("database = \"./a.db\"\ntest_database = \"a.db\"").unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn database_override_is_validated() {
        let origin = Path::new("--database");

        let config = TaskConfig::default()
            .with_database(PathBuf::from("other.db"), origin)
            .unwrap();
        assert_eq!(config.database, PathBuf::from("other.db"));

        let err = TaskConfig::default()
            .with_database(PathBuf::from("words.test.db"), origin)
            .unwrap_err();
        assert!(matches!(err, TaskError::Config { .. }));
        assert!(err.to_string().contains("--database"));
        assert!(err.to_string().contains("must differ"));

        let err = TaskConfig::default()
            .with_database(PathBuf::new(), origin)
            .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TaskConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, TaskConfig::default());
    }

    #[test]
    fn load_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TaskConfig::load(&dir.path().join("custom.toml")).unwrap_err();
        assert!(matches!(err, TaskError::Io { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "server_url = \"http://127.0.0.1:9000\"").unwrap();

        let config = TaskConfig::load_or_default(&path).unwrap();
        assert_eq!(config.server_url, "http://127.0.0.1:9000");
    }
}
