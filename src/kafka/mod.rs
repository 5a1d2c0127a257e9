//! Kafka health checks.
//!
//! Both checks follow the same pipeline: run a Kafka command-line tool on
//! the host, scan the raw output for [failure markers](markers), parse the
//! rest into records, and apply a rule to the records.
//!
//! # Modules
//!
//! - [`markers`] - Failure-marker scan shared by both checks
//! - [`partition`] - Duplicate partition leadership from `kafka-list-topic.sh`
//! - [`lag`] - Consumer lag from `ConsumerOffsetChecker`

pub mod lag;
pub mod markers;
pub mod partition;

pub use lag::{ConsumerLagCheck, LagRecord, OffsetCheckerRow};
pub use markers::{find_failure_marker, FAILURE_MARKERS};
pub use partition::{DuplicateLeader, PartitionRecord, PartitionStatusCheck, TopicListingRow};

/// Outcome of evaluating one command's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    /// No anomaly found. Also the outcome for output with no records.
    Pass,

    /// The output contained a failure marker and was not parsed.
    ToolFailure {
        /// The marker that matched.
        marker: &'static str,
    },

    /// Records that broke the rule, in output order.
    Anomalies(Vec<T>),
}

impl<T> Verdict<T> {
    /// Whether the output passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Build a verdict from the offending records.
    fn from_anomalies(anomalies: Vec<T>) -> Self {
        if anomalies.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Anomalies(anomalies)
        }
    }
}
