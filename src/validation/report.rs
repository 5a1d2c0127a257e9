//! Failure reporting.

use serde::Serialize;

use super::Host;

/// Receives failures from a check.
pub trait Reporter {
    /// Record a failure for `host` with a human-readable diagnostic.
    fn fail(&mut self, host: &Host, message: String);
}

/// A single failure recorded against a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostFailure {
    /// The host the failure was reported for.
    pub host: Host,
    /// Diagnostic message.
    pub message: String,
}

/// In-memory reporter that keeps failures in the order they were reported.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    failures: Vec<HostFailure>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no failure has been reported.
    pub fn is_pass(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failures in report order.
    pub fn failures(&self) -> &[HostFailure] {
        &self.failures
    }

    /// Failures reported for one host.
    pub fn failures_for(&self, host: &Host) -> Vec<&HostFailure> {
        self.failures.iter().filter(|f| &f.host == host).collect()
    }
}

impl Reporter for ValidationReport {
    fn fail(&mut self, host: &Host, message: String) {
        self.failures.push(HostFailure {
            host: host.clone(),
            message,
        });
    }
}
