//! Structured command lines.

use std::fmt;

/// A program and its arguments, kept as separate values.
///
/// Arguments are passed to the executor as a list. Nothing is quoted or
/// escaped; the [`Display`](fmt::Display) form is for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program path or name.
    pub program: String,

    /// Arguments in order.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Create a command line with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a flag followed by its value.
    pub fn flag(self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_args() {
        let cmd = CommandLine::new("/opt/kafka/bin/kafka-list-topic.sh");
        assert_eq!(cmd.program, "/opt/kafka/bin/kafka-list-topic.sh");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn flag_appends_name_and_value() {
        let cmd = CommandLine::new("tool")
            .arg("sub")
            .flag("--zookeeper", "zk1:2181,zk2:2181");

        assert_eq!(cmd.args, vec!["sub", "--zookeeper", "zk1:2181,zk2:2181"]);
    }

    #[test]
    fn display_joins_with_spaces() {
        let cmd = CommandLine::new("tool").flag("--group", "find_delivery");
        assert_eq!(cmd.to_string(), "tool --group find_delivery");
    }

    #[test]
    fn value_with_metacharacters_stays_one_argument() {
        let cmd = CommandLine::new("tool").flag("--zookeeper", "zk1:2181; rm -rf /");
        assert_eq!(cmd.args.len(), 2);
        assert_eq!(cmd.args[1], "zk1:2181; rm -rf /");
    }
}
