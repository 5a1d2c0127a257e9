//! Kafka health probes for remote hosts.
//!
//! Two checks run a Kafka command-line tool on a host, parse its text output
//! and report a failure for the host when something looks wrong:
//!
//! - [`PartitionStatusCheck`] flags a topic whose leader appears on more than
//!   one row of `kafka-list-topic.sh` output.
//! - [`ConsumerLagCheck`] flags consumer-group partitions lagging more than a
//!   threshold according to `ConsumerOffsetChecker`.
//!
//! Command transport is supplied by the caller through [`RemoteExecutor`];
//! results go to a [`Reporter`].
//!
//! # Modules
//!
//! - [`config`] - YAML configuration and check construction
//! - [`error`] - Error types and result aliases
//! - [`kafka`] - Output parsing and rule evaluation for both checks
//! - [`shell`] - Command lines and executors
//! - [`validation`] - Hosts, priorities and failure reporting
//!
//! # Example
//!
//! ```
//! use kafka_probes::shell::{executor_fn, CommandLine};
//! use kafka_probes::validation::{Host, Validation, ValidationReport};
//! use kafka_probes::ConsumerLagCheck;
//!
//! let executor = executor_fn(|_host: &Host, _cmd: &CommandLine| {
//!     Ok("find_delivery  events  0  100  130  30  none\r\n".to_string())
//! });
//! let check = ConsumerLagCheck::new(executor, "zk1:2181");
//!
//! let mut report = ValidationReport::new();
//! check.perform_on_host(&Host::new("kafka-01"), &mut report).unwrap();
//!
//! assert_eq!(
//!     report.failures()[0].message,
//!     "Kafka consumers are lagging on topic events on PID 0 is lagging by 30 messages."
//! );
//! ```

pub mod config;
pub mod error;
pub mod kafka;
pub mod shell;
pub mod validation;

pub use error::{ProbeError, Result};
pub use kafka::{ConsumerLagCheck, PartitionStatusCheck};
pub use shell::RemoteExecutor;
pub use validation::Reporter;
