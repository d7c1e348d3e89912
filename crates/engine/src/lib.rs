//! `engine` crate: task registry, dependency planning, and the executor.

pub mod dag;
pub mod error;
pub mod executor;
pub mod models;
pub mod registry;

pub use dag::{plan, validate_graph};
pub use error::EngineError;
pub use executor::TaskExecutor;
pub use models::RunReport;
pub use registry::TaskRegistry;

/// Task executed when none is named on the command line.
pub const DEFAULT_TASK: &str = tasks::builtin::RUN;
