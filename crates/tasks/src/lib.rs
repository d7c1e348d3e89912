//! `tasks` crate: the `ExecutableTask` trait and the built-in tasks.
//!
//! Every task must implement [`ExecutableTask`].  The engine crate resolves
//! dependencies and dispatches execution through this trait object.

pub mod builtin;
pub mod config;
pub mod error;
pub mod mock;
pub mod process;
pub mod traits;

pub use config::{CommandSpec, TaskConfig};
pub use error::TaskError;
pub use process::{CommandRunner, SystemRunner};
pub use traits::{ExecutableTask, TaskContext, TaskDefinition};
