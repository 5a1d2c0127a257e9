//! Failure markers printed by the Kafka command-line tools.
//!
//! The tools exit with status 0 on many failures and print the problem to
//! their output instead, so the only reliable signal is the text itself.
//! Matching is a literal, case-sensitive substring scan. Failures that
//! print none of these markers are parsed as data.

/// Substrings that mark tool output as a failure rather than data.
pub const FAILURE_MARKERS: &[&str] = &["No such file", "Missing required argument", "Exception"];

/// Return the first failure marker present in `output`, if any.
pub fn find_failure_marker(output: &str) -> Option<&'static str> {
    FAILURE_MARKERS
        .iter()
        .copied()
        .find(|marker| output.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_output_has_no_marker() {
        let output = "topic: events\tpartition: 0\tleader: 1\treplicas: 1,2\tisr: 1,2\n";
        assert_eq!(find_failure_marker(output), None);
    }

    #[test]
    fn detects_missing_script() {
        let output = "bash: /opt/kafka/bin/kafka-list-topic.sh: No such file or directory";
        assert_eq!(find_failure_marker(output), Some("No such file"));
    }

    #[test]
    fn detects_missing_argument() {
        let output = "Missing required argument \"[zookeeper]\"\nOption  Description";
        assert_eq!(find_failure_marker(output), Some("Missing required argument"));
    }

    #[test]
    fn detects_java_exception() {
        let output = "Exception in thread \"main\" org.I0Itec.zkclient.exception.ZkTimeoutException";
        assert_eq!(find_failure_marker(output), Some("Exception"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(find_failure_marker("no such file"), None);
        assert_eq!(find_failure_marker("exception"), None);
    }

    #[test]
    fn empty_output_has_no_marker() {
        assert_eq!(find_failure_marker(""), None);
    }
}
