//! Repository functions, one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! No task logic, no file handling. Pure SQL.

pub mod words;
