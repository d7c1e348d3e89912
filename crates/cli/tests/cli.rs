//! End-to-end tests for the `portal-tasks` binary.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS words (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    japanese TEXT NOT NULL,
    romaji   TEXT NOT NULL,
    english  TEXT NOT NULL
);";

const FIXTURES: &str =
    "INSERT INTO words (japanese, romaji, english) VALUES ('水', 'mizu', 'water'), ('火', 'hi', 'fire'), ('山', 'yama', 'mountain');";

/// The binary, rooted at `dir`, with the environment it reads cleared.
fn portal_tasks(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("portal-tasks");
    cmd.arg("-C").arg(dir).env_remove("PORTAL_DATABASE");
    cmd
}

/// A project directory with the default layout.
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let migrations = dir.path().join("db/migrations");
    std::fs::create_dir_all(&migrations).unwrap();
    std::fs::write(migrations.join("001_initial_schema.sql"), SCHEMA).unwrap();
    std::fs::write(dir.path().join("db/test_data.sql"), FIXTURES).unwrap();
    dir
}

fn word_count(path: &Path) -> i64 {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let pool = db::pool::open(path).await.unwrap();
        let count = db::repository::words::count_words(&pool).await.unwrap();
        pool.close().await;
        count
    })
}

#[test]
fn help_lists_every_task() {
    let dir = tempfile::tempdir().unwrap();
    portal_tasks(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("init-db"))
        .stdout(predicate::str::contains("reset-and-seed"))
        .stdout(predicate::str::contains("test-db"));
}

#[test]
fn list_shows_dependencies_and_default() {
    let dir = tempfile::tempdir().unwrap();
    portal_tasks(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[deps: reset, init-db, seed]"))
        .stdout(predicate::str::contains("(default)"));
}

#[test]
fn list_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let output = portal_tasks(dir.path())
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 8);
    let run = tasks.iter().find(|t| t["name"] == "run").unwrap();
    assert_eq!(run["deps"], serde_json::json!(["install"]));
}

#[test]
fn dry_run_without_task_plans_the_default() {
    let dir = tempfile::tempdir().unwrap();
    portal_tasks(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout("install\nrun\n");
}

#[test]
fn dry_run_reset_and_seed_touches_nothing() {
    let dir = project();
    portal_tasks(dir.path())
        .args(["--dry-run", "reset-and-seed"])
        .assert()
        .success()
        .stdout("reset\ninit-db\nseed\nreset-and-seed\n");
    assert!(!dir.path().join("words.db").exists());
}

#[test]
fn init_db_then_seed() {
    let dir = project();

    portal_tasks(dir.path()).arg("init-db").assert().success();
    portal_tasks(dir.path()).arg("seed").assert().success();

    assert_eq!(word_count(&dir.path().join("words.db")), 3);
}

#[test]
fn reset_and_seed_is_repeatable() {
    let dir = project();

    portal_tasks(dir.path()).arg("reset-and-seed").assert().success();
    portal_tasks(dir.path()).arg("reset-and-seed").assert().success();

    assert_eq!(word_count(&dir.path().join("words.db")), 3);
}

#[test]
fn reset_without_database_succeeds() {
    let dir = project();
    portal_tasks(dir.path()).arg("reset").assert().success();
}

#[test]
fn seed_without_database_fails_and_creates_nothing() {
    let dir = project();
    portal_tasks(dir.path())
        .arg("seed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("task 'seed' failed"));
    assert!(!dir.path().join("words.db").exists());
}

#[test]
fn test_db_loads_fixtures() {
    let dir = project();
    portal_tasks(dir.path()).arg("test-db").assert().success();
    assert_eq!(word_count(&dir.path().join("words.test.db")), 3);
}

#[test]
fn test_db_reports_missing_fixture_file() {
    let dir = project();
    std::fs::remove_file(dir.path().join("db/test_data.sql")).unwrap();

    portal_tasks(dir.path())
        .arg("test-db")
        .assert()
        .failure()
        .stderr(predicate::str::contains("test_data.sql"));
}

#[test]
fn database_flag_overrides_config() {
    let dir = project();
    std::fs::write(dir.path().join("Tasks.toml"), "database = \"from-config.db\"").unwrap();

    portal_tasks(dir.path())
        .args(["--database", "from-flag.db", "init-db"])
        .assert()
        .success();

    assert!(dir.path().join("from-flag.db").exists());
    assert!(!dir.path().join("from-config.db").exists());
}

#[test]
fn database_env_var_overrides_config() {
    let dir = project();

    portal_tasks(dir.path())
        .env("PORTAL_DATABASE", "from-env.db")
        .arg("init-db")
        .assert()
        .success();

    assert!(dir.path().join("from-env.db").exists());
    assert!(!dir.path().join("words.db").exists());
}

#[test]
fn database_override_cannot_point_at_the_test_database() {
    let dir = project();

    portal_tasks(dir.path())
        .args(["--database", "words.test.db", "reset-and-seed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
    assert!(!dir.path().join("words.test.db").exists());

    portal_tasks(dir.path())
        .env("PORTAL_DATABASE", "./words.test.db")
        .arg("reset-and-seed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
    assert!(!dir.path().join("words.test.db").exists());
}

#[test]
fn config_flag_selects_another_file() {
    let dir = project();
    std::fs::write(dir.path().join("Tasks.toml"), "database = \"from-default.db\"").unwrap();
    let custom = dir.path().join("custom.toml");
    std::fs::write(&custom, "database = \"from-custom.db\"").unwrap();

    portal_tasks(dir.path())
        .arg("--config")
        .arg(&custom)
        .arg("init-db")
        .assert()
        .success();

    assert!(dir.path().join("from-custom.db").exists());
    assert!(!dir.path().join("from-default.db").exists());
}

#[test]
fn config_flag_requires_the_file() {
    let dir = project();

    portal_tasks(dir.path())
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = project();
    std::fs::write(dir.path().join("Tasks.toml"), "databse = \"typo.db\"").unwrap();

    portal_tasks(dir.path())
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tasks.toml"));
}

#[test]
fn missing_project_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    portal_tasks(&dir.path().join("missing"))
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
#[test]
fn build_runs_install_then_build_commands() {
    let dir = project();
    std::fs::write(
        dir.path().join("Tasks.toml"),
        r#"
        [commands]
        install = { program = "sh", args = ["-c", "echo installed >> steps.txt"] }
        build = { program = "sh", args = ["-c", "echo built >> steps.txt"] }
        "#,
    )
    .unwrap();

    portal_tasks(dir.path()).arg("build").assert().success();

    let steps = std::fs::read_to_string(dir.path().join("steps.txt")).unwrap();
    assert_eq!(steps, "installed\nbuilt\n");
}

#[cfg(unix)]
#[test]
fn failing_install_stops_the_run() {
    let dir = project();
    std::fs::write(
        dir.path().join("Tasks.toml"),
        r#"
        [commands]
        install = { program = "false" }
        run = { program = "sh", args = ["-c", "touch ran"] }
        "#,
    )
    .unwrap();

    portal_tasks(dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("task 'install' failed"));

    assert!(!dir.path().join("ran").exists());
}

#[cfg(unix)]
#[test]
fn run_logs_the_server_url_before_starting() {
    let dir = project();
    std::fs::write(
        dir.path().join("Tasks.toml"),
        r#"
        server_url = "http://127.0.0.1:9999"

        [commands]
        install = { program = "true" }
        run = { program = "true" }
        "#,
    )
    .unwrap();

    portal_tasks(dir.path())
        .env("RUST_LOG", "info")
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Starting server on http://127.0.0.1:9999"));
}
