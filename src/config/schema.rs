//! Configuration schema for the Kafka probes.
//!
//! ```yaml
//! zookeeper_nodes: zk1:2181,zk2:2181,zk3:2181
//! priority: critical
//! partition_status:
//!   list_topic_command: /opt/kafka/bin/kafka-list-topic.sh
//! consumer_lag:
//!   run_class_command: /usr/local/kafka/bin/kafka-run-class.sh
//!   group: find_delivery
//!   lag_threshold: 5
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};
use crate::kafka::lag::{DEFAULT_GROUP, DEFAULT_LAG_THRESHOLD, DEFAULT_RUN_CLASS_COMMAND};
use crate::kafka::partition::DEFAULT_LIST_TOPIC_COMMAND;
use crate::kafka::{ConsumerLagCheck, PartitionStatusCheck};
use crate::shell::RemoteExecutor;
use crate::validation::Priority;

/// Root configuration for both checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaProbesConfig {
    /// Comma-separated zookeeper `host:port` list.
    pub zookeeper_nodes: String,

    /// Priority of both checks.
    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub partition_status: PartitionStatusSettings,

    #[serde(default)]
    pub consumer_lag: ConsumerLagSettings,
}

/// Settings for the partition status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartitionStatusSettings {
    /// Path of `kafka-list-topic.sh` on the hosts.
    pub list_topic_command: String,
}

impl Default for PartitionStatusSettings {
    fn default() -> Self {
        Self {
            list_topic_command: DEFAULT_LIST_TOPIC_COMMAND.to_string(),
        }
    }
}

/// Settings for the consumer lag check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumerLagSettings {
    /// Path of `kafka-run-class.sh` on the hosts.
    pub run_class_command: String,

    /// Consumer group to inspect.
    pub group: String,

    /// Largest lag, in messages, that still passes.
    pub lag_threshold: u64,
}

impl Default for ConsumerLagSettings {
    fn default() -> Self {
        Self {
            run_class_command: DEFAULT_RUN_CLASS_COMMAND.to_string(),
            group: DEFAULT_GROUP.to_string(),
            lag_threshold: DEFAULT_LAG_THRESHOLD,
        }
    }
}

impl KafkaProbesConfig {
    /// Config with default settings for the given zookeeper nodes.
    pub fn new(zookeeper_nodes: impl Into<String>) -> Self {
        Self {
            zookeeper_nodes: zookeeper_nodes.into(),
            priority: Priority::default(),
            partition_status: PartitionStatusSettings::default(),
            consumer_lag: ConsumerLagSettings::default(),
        }
    }

    /// Reject values that cannot form a sensible command line.
    ///
    /// The zookeeper string is passed as a single argument, so whitespace
    /// or a leading `-` would be read by the tool as extra options.
    pub fn validate(&self) -> Result<()> {
        let nodes = &self.zookeeper_nodes;
        if nodes.is_empty() {
            return Err(invalid("zookeeper_nodes must not be empty"));
        }
        if nodes.chars().any(char::is_whitespace) {
            return Err(invalid(format!(
                "zookeeper_nodes must not contain whitespace: '{}'",
                nodes
            )));
        }
        if nodes.starts_with('-') {
            return Err(invalid(format!(
                "zookeeper_nodes must not start with '-': '{}'",
                nodes
            )));
        }

        if self.partition_status.list_topic_command.trim().is_empty() {
            return Err(invalid("partition_status.list_topic_command must not be empty"));
        }
        if self.consumer_lag.run_class_command.trim().is_empty() {
            return Err(invalid("consumer_lag.run_class_command must not be empty"));
        }
        if self.consumer_lag.group.trim().is_empty() {
            return Err(invalid("consumer_lag.group must not be empty"));
        }
        Ok(())
    }

    /// Build the partition status check.
    pub fn partition_status_check<E: RemoteExecutor>(&self, executor: E) -> PartitionStatusCheck<E> {
        PartitionStatusCheck::new(executor, &self.zookeeper_nodes)
            .with_list_topic_command(&self.partition_status.list_topic_command)
            .with_priority(self.priority)
    }

    /// Build the consumer lag check.
    pub fn consumer_lag_check<E: RemoteExecutor>(&self, executor: E) -> ConsumerLagCheck<E> {
        ConsumerLagCheck::new(executor, &self.zookeeper_nodes)
            .with_run_class_command(&self.consumer_lag.run_class_command)
            .with_group(&self.consumer_lag.group)
            .with_lag_threshold(self.consumer_lag.lag_threshold)
            .with_priority(self.priority)
    }
}

fn invalid(message: impl Into<String>) -> ProbeError {
    ProbeError::ConfigValidationError {
        message: message.into(),
    }
}
