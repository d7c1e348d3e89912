//! The built-in tasks.
//!
//! | task             | depends on                   |
//! |------------------|------------------------------|
//! | `install`        |                              |
//! | `run`            | `install`                    |
//! | `build`          | `install`                    |
//! | `init-db`        |                              |
//! | `seed`           |                              |
//! | `reset`          |                              |
//! | `reset-and-seed` | `reset`, `init-db`, `seed`   |
//! | `test-db`        |                              |

use std::sync::Arc;

use crate::ExecutableTask;

pub mod database;
pub mod server;

pub use database::{InitDb, Reset, ResetAndSeed, Seed, TestDb};
pub use server::{Build, Install, Run};

pub const INSTALL: &str = "install";
pub const RUN: &str = "run";
pub const BUILD: &str = "build";
pub const INIT_DB: &str = "init-db";
pub const SEED: &str = "seed";
pub const RESET: &str = "reset";
pub const RESET_AND_SEED: &str = "reset-and-seed";
pub const TEST_DB: &str = "test-db";

/// Every built-in task.
pub fn all() -> Vec<Arc<dyn ExecutableTask>> {
    vec![
        Arc::new(Install),
        Arc::new(Run),
        Arc::new(Build),
        Arc::new(InitDb),
        Arc::new(Seed),
        Arc::new(Reset),
        Arc::new(ResetAndSeed),
        Arc::new(TestDb),
    ]
}
