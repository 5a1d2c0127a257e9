//! Partition status check.
//!
//! `kafka-list-topic.sh` prints one line per partition with five
//! tab-separated fields:
//!
//! ```text
//! topic: events	partition: 0	leader: 1	replicas: 1,2	isr: 1,2
//! ```
//!
//! The check fails when the same `(topic, leader)` pair appears on more than
//! one row.

use std::collections::HashMap;
use std::fmt;

use super::markers::find_failure_marker;
use super::Verdict;
use crate::error::Result;
use crate::shell::{CommandLine, RemoteExecutor};
use crate::validation::{Host, Priority, Reporter, Validation};

/// Default location of the topic listing script.
pub const DEFAULT_LIST_TOPIC_COMMAND: &str = "/opt/kafka/bin/kafka-list-topic.sh";

/// Number of fields in one row of topic listing output.
const FIELDS_PER_ROW: usize = 5;

/// One row of topic listing output.
///
/// Rows are cut from the token stream in groups of five. Only a final,
/// truncated group can be missing the replica fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicListingRow<'a> {
    pub topic: &'a str,
    pub partition: &'a str,
    pub leader: &'a str,
    pub replicas: Option<&'a str>,
    pub isr: Option<&'a str>,
}

impl<'a> TopicListingRow<'a> {
    /// Build a row from up to five fields. Needs at least the leader field.
    fn from_fields(fields: &[&'a str]) -> Option<Self> {
        match *fields {
            [topic, partition, leader, ref rest @ ..] => Some(Self {
                topic,
                partition,
                leader,
                replicas: rest.first().copied(),
                isr: rest.get(1).copied(),
            }),
            _ => None,
        }
    }

    /// The part of the row the leadership rule looks at.
    pub fn record(&self) -> PartitionRecord {
        PartitionRecord {
            topic: self.topic.to_string(),
            leader: self.leader.to_string(),
        }
    }
}

/// Topic and leader of one partition row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionRecord {
    pub topic: String,
    pub leader: String,
}

/// A `(topic, leader)` pair seen on more than one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLeader {
    pub topic: String,
    pub leader: String,
    pub count: usize,
}

impl fmt::Display for DuplicateLeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {} ({} occurrences)",
            self.topic, self.leader, self.count
        )
    }
}

/// Split topic listing output into rows.
///
/// Tokens are separated by tabs or newlines and are not trimmed. Empty
/// tokens (blank lines, a trailing newline) still occupy a field slot.
pub fn parse_rows(output: &str) -> Vec<TopicListingRow<'_>> {
    let tokens: Vec<&str> = output.split(['\t', '\n']).collect();
    tokens
        .chunks(FIELDS_PER_ROW)
        .filter_map(TopicListingRow::from_fields)
        .collect()
}

/// Parse topic listing output into `(topic, leader)` records.
pub fn parse_partition_records(output: &str) -> Vec<PartitionRecord> {
    parse_rows(output).iter().map(TopicListingRow::record).collect()
}

/// Find every `(topic, leader)` pair that occurs more than once.
///
/// Duplicates are returned in the order their pair first appeared.
pub fn find_duplicate_leaders(records: &[PartitionRecord]) -> Vec<DuplicateLeader> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut first_seen = Vec::new();

    for record in records {
        let key = (record.topic.as_str(), record.leader.as_str());
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            first_seen.push(key);
        }
        *count += 1;
    }

    first_seen
        .into_iter()
        .filter_map(|(topic, leader)| {
            let count = counts[&(topic, leader)];
            (count > 1).then(|| DuplicateLeader {
                topic: topic.to_string(),
                leader: leader.to_string(),
                count,
            })
        })
        .collect()
}

/// Evaluate topic listing output.
///
/// A failure marker short-circuits parsing.
pub fn evaluate(output: &str) -> Verdict<DuplicateLeader> {
    if let Some(marker) = find_failure_marker(output) {
        return Verdict::ToolFailure { marker };
    }

    let records = parse_partition_records(output);
    tracing::trace!("Parsed {} partition records", records.len());
    Verdict::from_anomalies(find_duplicate_leaders(&records))
}

/// Failure message for a verdict, or `None` if it passed.
pub fn failure_message(
    host: &Host,
    output: &str,
    verdict: &Verdict<DuplicateLeader>,
) -> Option<String> {
    match verdict {
        Verdict::Pass => None,
        Verdict::ToolFailure { .. } => Some(format!(
            "An exception occurred while checking Kafka cluster health on {} ({})",
            host, output
        )),
        Verdict::Anomalies(duplicates) => Some(format!(
            "Kafka partitions are out of sync. \
             Multiple leaders for the same partition for the same replica: {}",
            duplicates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// Checks that no topic has the same leader listed on more than one row.
#[derive(Debug, Clone)]
pub struct PartitionStatusCheck<E> {
    executor: E,
    zookeeper_nodes: String,
    list_topic_command: String,
    priority: Priority,
}

impl<E: RemoteExecutor> PartitionStatusCheck<E> {
    /// Name reported to the validation framework.
    pub const NAME: &'static str = "Kafka partition status";

    /// Create a check against the given zookeeper connection string
    /// (e.g. `"zk1:2181,zk2:2181,zk3:2181"`).
    pub fn new(executor: E, zookeeper_nodes: impl Into<String>) -> Self {
        Self {
            executor,
            zookeeper_nodes: zookeeper_nodes.into(),
            list_topic_command: DEFAULT_LIST_TOPIC_COMMAND.to_string(),
            priority: Priority::default(),
        }
    }

    /// Use a different topic listing script.
    pub fn with_list_topic_command(mut self, command: impl Into<String>) -> Self {
        self.list_topic_command = command.into();
        self
    }

    /// Set the escalation priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// The command run on each host.
    pub fn command(&self) -> CommandLine {
        CommandLine::new(&self.list_topic_command).flag("--zookeeper", &self.zookeeper_nodes)
    }
}

impl<E: RemoteExecutor> Validation for PartitionStatusCheck<E> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn perform_on_host(&self, host: &Host, reporter: &mut dyn Reporter) -> Result<()> {
        let span = tracing::info_span!("partition_status", host = %host);
        let _enter = span.enter();

        let command = self.command();
        tracing::debug!("Running {}", command);
        let output = self.executor.run(host, &command)?;

        let verdict = evaluate(&output);
        match &verdict {
            Verdict::Pass => tracing::debug!("No duplicate partition leaders on {}", host),
            Verdict::ToolFailure { marker } => {
                tracing::warn!("Topic listing on {} failed: found '{}'", host, marker)
            }
            Verdict::Anomalies(duplicates) => {
                tracing::warn!("{} duplicate partition leaders on {}", duplicates.len(), host)
            }
        }

        if let Some(message) = failure_message(host, &output, &verdict) {
            reporter.fail(host, message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::shell::executor_fn;
    use crate::validation::ValidationReport;
    use std::cell::RefCell;

    const HEALTHY: &str = "topic: events\tpartition: 0\tleader: 1\treplicas: 1,2\tisr: 1,2\n\
                           topic: events\tpartition: 1\tleader: 2\treplicas: 2,1\tisr: 2,1\n\
                           topic: audit\tpartition: 0\tleader: 1\treplicas: 1,2\tisr: 1,2\n";

    const DUPLICATED: &str = "topic: events\tpartition: 0\tleader: 1\treplicas: 1,2\tisr: 1,2\n\
                              topic: events\tpartition: 1\tleader: 1\treplicas: 1,2\tisr: 1\n";

    fn record(topic: &str, leader: &str) -> PartitionRecord {
        PartitionRecord {
            topic: topic.to_string(),
            leader: leader.to_string(),
        }
    }

    #[test]
    fn parse_rows_names_fields() {
        let rows = parse_rows("topic: events\tpartition: 0\tleader: 1\treplicas: 1,2\tisr: 1,2");
        assert_eq!(
            rows,
            vec![TopicListingRow {
                topic: "topic: events",
                partition: "partition: 0",
                leader: "leader: 1",
                replicas: Some("replicas: 1,2"),
                isr: Some("isr: 1,2"),
            }]
        );
    }

    #[test]
    fn parse_rows_drops_trailing_group_without_leader() {
        // The trailing newline leaves one empty token after the last row.
        let rows = parse_rows(DUPLICATED);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn parse_rows_keeps_truncated_group_with_leader() {
        let rows = parse_rows("a\tb\tc\td\te\tf\tg\th");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].topic, "f");
        assert_eq!(rows[1].leader, "h");
        assert_eq!(rows[1].replicas, None);
        assert_eq!(rows[1].isr, None);
    }

    #[test]
    fn parse_empty_output_yields_nothing() {
        assert!(parse_partition_records("").is_empty());
    }

    #[test]
    fn parse_uses_field_zero_and_two() {
        let records = parse_partition_records(HEALTHY);
        assert_eq!(
            records,
            vec![
                record("topic: events", "leader: 1"),
                record("topic: events", "leader: 2"),
                record("topic: audit", "leader: 1"),
            ]
        );
    }

    #[test]
    fn parse_is_repeatable() {
        assert_eq!(
            parse_partition_records(DUPLICATED),
            parse_partition_records(DUPLICATED)
        );
    }

    #[test]
    fn no_duplicates_in_distinct_pairs() {
        let records = vec![record("a", "1"), record("a", "2"), record("b", "1")];
        assert!(find_duplicate_leaders(&records).is_empty());
    }

    #[test]
    fn duplicates_counted_in_first_seen_order() {
        let records = vec![
            record("b", "2"),
            record("a", "1"),
            record("b", "2"),
            record("a", "1"),
            record("a", "1"),
            record("c", "3"),
        ];

        assert_eq!(
            find_duplicate_leaders(&records),
            vec![
                DuplicateLeader {
                    topic: "b".into(),
                    leader: "2".into(),
                    count: 2
                },
                DuplicateLeader {
                    topic: "a".into(),
                    leader: "1".into(),
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn evaluate_healthy_passes() {
        assert_eq!(evaluate(HEALTHY), Verdict::Pass);
    }

    #[test]
    fn evaluate_duplicate_pair_fails() {
        assert_eq!(
            evaluate(DUPLICATED),
            Verdict::Anomalies(vec![DuplicateLeader {
                topic: "topic: events".into(),
                leader: "leader: 1".into(),
                count: 2,
            }])
        );
    }

    #[test]
    fn evaluate_marker_wins_over_duplicates() {
        let output = format!("{}Exception in thread \"main\"", DUPLICATED);
        assert_eq!(
            evaluate(&output),
            Verdict::ToolFailure {
                marker: "Exception"
            }
        );
    }

    #[test]
    fn pass_has_no_message() {
        assert_eq!(failure_message(&Host::new("h"), HEALTHY, &Verdict::Pass), None);
    }

    #[test]
    fn tool_failure_message_embeds_host_and_output() {
        let output = "sh: kafka-list-topic.sh: No such file or directory";
        let message = failure_message(&Host::new("kafka-01"), output, &evaluate(output)).unwrap();
        assert_eq!(
            message,
            "An exception occurred while checking Kafka cluster health on kafka-01 \
             (sh: kafka-list-topic.sh: No such file or directory)"
        );
    }

    #[test]
    fn anomaly_message_lists_every_pair() {
        let verdict = Verdict::Anomalies(vec![
            DuplicateLeader {
                topic: "a".into(),
                leader: "1".into(),
                count: 2,
            },
            DuplicateLeader {
                topic: "b".into(),
                leader: "3".into(),
                count: 4,
            },
        ]);
        let message = failure_message(&Host::new("h"), "", &verdict).unwrap();
        assert_eq!(
            message,
            "Kafka partitions are out of sync. Multiple leaders for the same partition \
             for the same replica: a has 1 (2 occurrences), b has 3 (4 occurrences)"
        );
    }

    #[test]
    fn command_appends_zookeeper_flag() {
        let check = PartitionStatusCheck::new(
            executor_fn(|_h: &Host, _c: &CommandLine| Ok(String::new())),
            "zk1:2181,zk2:2181",
        );
        assert_eq!(
            check.command().to_string(),
            "/opt/kafka/bin/kafka-list-topic.sh --zookeeper zk1:2181,zk2:2181"
        );
    }

    #[test]
    fn custom_command_and_priority() {
        let check = PartitionStatusCheck::new(
            executor_fn(|_h: &Host, _c: &CommandLine| Ok(String::new())),
            "zk:2181",
        )
        .with_list_topic_command("/usr/local/kafka/bin/kafka-list-topic.sh")
        .with_priority(Priority::Critical);

        assert_eq!(
            check.command().program,
            "/usr/local/kafka/bin/kafka-list-topic.sh"
        );
        assert_eq!(check.priority(), Priority::Critical);
        assert_eq!(check.name(), "Kafka partition status");
    }

    #[test]
    fn perform_on_host_runs_command_on_that_host() {
        let seen = RefCell::new(Vec::new());
        let check = PartitionStatusCheck::new(
            executor_fn(|host: &Host, cmd: &CommandLine| {
                seen.borrow_mut().push((host.clone(), cmd.clone()));
                Ok(HEALTHY.to_string())
            }),
            "zk:2181",
        );
        let mut report = ValidationReport::new();

        check
            .perform_on_host(&Host::new("kafka-01"), &mut report)
            .unwrap();

        assert!(report.is_pass());
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Host::new("kafka-01"));
        assert_eq!(seen[0].1.args, vec!["--zookeeper", "zk:2181"]);
    }

    #[test]
    fn perform_on_host_reports_duplicates() {
        let check = PartitionStatusCheck::new(
            executor_fn(|_h: &Host, _c: &CommandLine| Ok(DUPLICATED.to_string())),
            "zk:2181",
        );
        let mut report = ValidationReport::new();

        check
            .perform_on_host(&Host::new("kafka-01"), &mut report)
            .unwrap();

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].host, Host::new("kafka-01"));
        assert!(failures[0]
            .message
            .ends_with("topic: events has leader: 1 (2 occurrences)"));
    }

    #[test]
    fn perform_on_host_propagates_transport_errors() {
        let check = PartitionStatusCheck::new(
            executor_fn(|host: &Host, _c: &CommandLine| {
                Err(ProbeError::Transport {
                    host: host.to_string(),
                    message: "connection reset".into(),
                })
            }),
            "zk:2181",
        );
        let mut report = ValidationReport::new();

        let result = check.perform_on_host(&Host::new("kafka-01"), &mut report);

        assert!(matches!(result, Err(ProbeError::Transport { .. })));
        assert!(report.is_pass());
    }
}
