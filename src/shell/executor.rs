//! Command executors.
//!
//! A [`RemoteExecutor`] runs a [`CommandLine`] against a host and returns
//! its textual output. Transport (SSH sessions, connection reuse, timeouts)
//! is the executor's business; checks only see the text.

use std::process::Command;
use std::sync::Arc;

use super::command::CommandLine;
use crate::error::{ProbeError, Result};
use crate::validation::Host;

/// Runs commands on a host and returns their combined output.
pub trait RemoteExecutor {
    /// Execute `command` on `host`.
    fn run(&self, host: &Host, command: &CommandLine) -> Result<String>;
}

impl<E: RemoteExecutor + ?Sized> RemoteExecutor for &E {
    fn run(&self, host: &Host, command: &CommandLine) -> Result<String> {
        (**self).run(host, command)
    }
}

impl<E: RemoteExecutor + ?Sized> RemoteExecutor for Box<E> {
    fn run(&self, host: &Host, command: &CommandLine) -> Result<String> {
        (**self).run(host, command)
    }
}

impl<E: RemoteExecutor + ?Sized> RemoteExecutor for Arc<E> {
    fn run(&self, host: &Host, command: &CommandLine) -> Result<String> {
        (**self).run(host, command)
    }
}

/// Executor backed by a closure.
#[derive(Clone)]
pub struct FnExecutor<F> {
    f: F,
}

/// Wrap a closure as a [`RemoteExecutor`].
///
/// # Example
///
/// ```
/// use kafka_probes::shell::{executor_fn, CommandLine, RemoteExecutor};
/// use kafka_probes::validation::Host;
///
/// let executor = executor_fn(|host: &Host, _cmd: &CommandLine| Ok(format!("hello from {}", host)));
/// let output = executor.run(&Host::new("kafka-01"), &CommandLine::new("true")).unwrap();
/// assert_eq!(output, "hello from kafka-01");
/// ```
pub fn executor_fn<F>(f: F) -> FnExecutor<F>
where
    F: Fn(&Host, &CommandLine) -> Result<String>,
{
    FnExecutor { f }
}

impl<F> RemoteExecutor for FnExecutor<F>
where
    F: Fn(&Host, &CommandLine) -> Result<String>,
{
    fn run(&self, host: &Host, command: &CommandLine) -> Result<String> {
        (self.f)(host, command)
    }
}

/// Runs commands as child processes on the local machine.
///
/// The host is only used for logging. No shell is involved: the program
/// is spawned directly with its argument list. Standard output is returned
/// followed by standard error. A non-zero exit status is not an error,
/// since the tools print their failures as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor;

impl RemoteExecutor for LocalExecutor {
    fn run(&self, host: &Host, command: &CommandLine) -> Result<String> {
        tracing::debug!("Running locally for {}: {}", host, command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| {
                tracing::warn!("Failed to spawn {}: {}", command.program, e);
                ProbeError::CommandFailed {
                    command: command.to_string(),
                    code: None,
                }
            })?;

        if !output.status.success() {
            tracing::debug!(
                "{} exited with {:?}",
                command.program,
                output.status.code()
            );
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}
