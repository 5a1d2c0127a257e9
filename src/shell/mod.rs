//! Command construction and execution.

pub mod command;
pub mod executor;

pub use command::CommandLine;
pub use executor::{executor_fn, FnExecutor, LocalExecutor, RemoteExecutor};
