//! Consumer lag check.
//!
//! Runs `kafka.tools.ConsumerOffsetChecker` for one consumer group and
//! fails when any partition lags behind the log end by more than a
//! threshold. The tool prints a column-aligned table:
//!
//! ```text
//! Group           Topic                          Pid Offset          logSize         Lag             Owner
//! find_delivery   deliveries                     0   1200            1203            3               none
//! ```
//!
//! Columns are separated by runs of two or more whitespace characters.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::markers::find_failure_marker;
use super::Verdict;
use crate::error::Result;
use crate::shell::{CommandLine, RemoteExecutor};
use crate::validation::{Host, Priority, Reporter, Validation};

/// Default location of the Kafka class runner.
pub const DEFAULT_RUN_CLASS_COMMAND: &str = "/usr/local/kafka/bin/kafka-run-class.sh";

/// Consumer group checked unless configured otherwise.
pub const DEFAULT_GROUP: &str = "find_delivery";

/// Largest lag, in messages, that still passes.
pub const DEFAULT_LAG_THRESHOLD: u64 = 5;

const OFFSET_CHECKER_CLASS: &str = "kafka.tools.ConsumerOffsetChecker";

/// Header value of the topic column.
const TOPIC_HEADER: &str = "Topic";

static LINE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t|\r?\n").expect("LINE_SEPARATOR must compile"));

static FIELD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\s+").expect("FIELD_SEPARATOR must compile"));

/// One line of offset checker output with at least three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCheckerRow<'a> {
    pub group: &'a str,
    pub topic: &'a str,
    pub pid: &'a str,
    pub offset: Option<&'a str>,
    pub log_size: Option<&'a str>,
    pub lag: Option<&'a str>,
    pub owner: Option<&'a str>,
}

impl<'a> OffsetCheckerRow<'a> {
    fn from_fields(fields: &[&'a str]) -> Option<Self> {
        match *fields {
            [group, topic, pid, ref rest @ ..] => Some(Self {
                group,
                topic,
                pid,
                offset: rest.first().copied(),
                log_size: rest.get(1).copied(),
                lag: rest.get(2).copied(),
                owner: rest.get(3).copied(),
            }),
            _ => None,
        }
    }

    /// Convert to a lag record if topic, pid and lag all validate.
    ///
    /// Header rows and rows with non-numeric pid or lag give `None`.
    pub fn record(&self) -> Option<LagRecord> {
        if self.topic == TOPIC_HEADER {
            return None;
        }
        let pid = parse_digits(self.pid)?;
        let lag = parse_digits(self.lag?)?;
        Some(LagRecord {
            topic: self.topic.to_string(),
            pid,
            lag,
        })
    }
}

/// Lag of one partition for the checked consumer group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagRecord {
    pub topic: String,
    pub pid: u32,
    pub lag: u64,
}

impl fmt::Display for LagRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on PID {} is lagging by {} messages.",
            self.topic, self.pid, self.lag
        )
    }
}

/// Parse a field made only of ASCII digits.
///
/// Signs, whitespace and out-of-range values are rejected.
fn parse_digits<T: std::str::FromStr>(field: &str) -> Option<T> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Split offset checker output into rows of more than two fields.
///
/// Lines end at a tab, CRLF or LF. Lines with two fields or fewer
/// (blank lines, separators, single-space text) are skipped.
pub fn parse_rows(output: &str) -> Vec<OffsetCheckerRow<'_>> {
    LINE_SEPARATOR
        .split(output)
        .filter_map(|line| {
            let fields: Vec<&str> = FIELD_SEPARATOR.split(line).collect();
            OffsetCheckerRow::from_fields(&fields)
        })
        .collect()
}

/// Parse offset checker output into lag records.
///
/// A record is produced only for a row whose topic, pid and lag are all
/// valid, so the three values always come from the same line.
pub fn parse_lag_records(output: &str) -> Vec<LagRecord> {
    parse_rows(output)
        .iter()
        .filter_map(OffsetCheckerRow::record)
        .collect()
}

/// Records whose lag is strictly above `threshold`.
pub fn find_laggers(records: &[LagRecord], threshold: u64) -> Vec<LagRecord> {
    records
        .iter()
        .filter(|record| record.lag > threshold)
        .cloned()
        .collect()
}

/// Evaluate offset checker output against a lag threshold.
///
/// A failure marker short-circuits parsing.
pub fn evaluate(output: &str, threshold: u64) -> Verdict<LagRecord> {
    if let Some(marker) = find_failure_marker(output) {
        return Verdict::ToolFailure { marker };
    }

    let records = parse_lag_records(output);
    tracing::trace!("Parsed {} lag records", records.len());
    Verdict::from_anomalies(find_laggers(&records, threshold))
}

/// Failure message for a verdict, or `None` if it passed.
pub fn failure_message(host: &Host, output: &str, verdict: &Verdict<LagRecord>) -> Option<String> {
    match verdict {
        Verdict::Pass => None,
        Verdict::ToolFailure { .. } => Some(format!(
            "An exception occurred while checking Kafka consumer lag on {} ({})",
            host, output
        )),
        Verdict::Anomalies(laggers) => Some(format!(
            "Kafka consumers are lagging on topic {}",
            laggers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

/// Checks that no partition of a consumer group lags beyond a threshold.
#[derive(Debug, Clone)]
pub struct ConsumerLagCheck<E> {
    executor: E,
    zookeeper_nodes: String,
    run_class_command: String,
    group: String,
    lag_threshold: u64,
    priority: Priority,
}

impl<E: RemoteExecutor> ConsumerLagCheck<E> {
    /// Name reported to the validation framework.
    pub const NAME: &'static str = "Kafka Consumer Lag Monitor";

    /// Create a check against the given zookeeper connection string.
    pub fn new(executor: E, zookeeper_nodes: impl Into<String>) -> Self {
        Self {
            executor,
            zookeeper_nodes: zookeeper_nodes.into(),
            run_class_command: DEFAULT_RUN_CLASS_COMMAND.to_string(),
            group: DEFAULT_GROUP.to_string(),
            lag_threshold: DEFAULT_LAG_THRESHOLD,
            priority: Priority::default(),
        }
    }

    /// Use a different `kafka-run-class.sh`.
    pub fn with_run_class_command(mut self, command: impl Into<String>) -> Self {
        self.run_class_command = command.into();
        self
    }

    /// Check a different consumer group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the largest lag that still passes.
    pub fn with_lag_threshold(mut self, threshold: u64) -> Self {
        self.lag_threshold = threshold;
        self
    }

    /// Set the escalation priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn lag_threshold(&self) -> u64 {
        self.lag_threshold
    }

    /// The command run on each host.
    pub fn command(&self) -> CommandLine {
        CommandLine::new(&self.run_class_command)
            .arg(OFFSET_CHECKER_CLASS)
            .flag("--group", &self.group)
            .flag("--zkconnect", &self.zookeeper_nodes)
    }
}

impl<E: RemoteExecutor> Validation for ConsumerLagCheck<E> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn perform_on_host(&self, host: &Host, reporter: &mut dyn Reporter) -> Result<()> {
        let span = tracing::info_span!("consumer_lag", host = %host, group = %self.group);
        let _enter = span.enter();

        let command = self.command();
        tracing::debug!("Running {}", command);
        let output = self.executor.run(host, &command)?;

        let verdict = evaluate(&output, self.lag_threshold);
        match &verdict {
            Verdict::Pass => tracing::debug!("No lagging partitions on {}", host),
            Verdict::ToolFailure { marker } => {
                tracing::warn!("Offset check on {} failed: found '{}'", host, marker)
            }
            Verdict::Anomalies(laggers) => tracing::warn!(
                "{} partitions lag by more than {} on {}",
                laggers.len(),
                self.lag_threshold,
                host
            ),
        }

        if let Some(message) = failure_message(host, &output, &verdict) {
            reporter.fail(host, message);
        }
        Ok(())
    }
}
