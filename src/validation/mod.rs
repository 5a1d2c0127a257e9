//! Interfaces shared with the surrounding validation framework.
//!
//! The framework owns host iteration, scheduling and alerting. A check
//! implements [`Validation`] and reports failures for a host through a
//! [`Reporter`]; a host with no reported failure passed.
//!
//! # Modules
//!
//! - [`report`] - Failure reporting and the in-memory [`ValidationReport`]

pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

pub use report::{HostFailure, Reporter, ValidationReport};

/// A host a check runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(String);

impl Host {
    /// Create a host from its name or address.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The host name as given.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Host {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Host {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// How urgently a failing check should be escalated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Informational.
    Low,
    /// Standard escalation.
    #[default]
    Normal,
    /// Page someone.
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

/// A check that can be performed against a single host.
pub trait Validation {
    /// Human-readable name of the check.
    fn name(&self) -> &str;

    /// Escalation priority for failures of this check.
    fn priority(&self) -> Priority;

    /// Run the check on `host`, reporting any failure to `reporter`.
    ///
    /// Returns an error only when the command could not be executed.
    fn perform_on_host(&self, host: &Host, reporter: &mut dyn Reporter) -> Result<()>;

    /// Run the check on each host in order.
    ///
    /// Stops at the first execution error; failures already reported for
    /// earlier hosts are kept by the reporter.
    fn perform(&self, hosts: &[Host], reporter: &mut dyn Reporter) -> Result<()> {
        for host in hosts {
            self.perform_on_host(host, reporter)?;
        }
        Ok(())
    }
}
