//! Error types for probe operations.
//!
//! This module defines [`ProbeError`], the error type returned by command
//! execution and configuration loading, and a [`Result`] type alias.
//!
//! Output parsing never returns an error: malformed rows are skipped and
//! tool failures are reported to the validation framework as host failures.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for probe operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Configuration parsed but holds unusable values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Command could not be started or ended without an exit code.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The executor could not reach the host.
    #[error("Transport error on {host}: {message}")]
    Transport { host: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for executors defined outside this crate.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
