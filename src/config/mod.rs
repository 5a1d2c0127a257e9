//! Configuration for the Kafka probes.
//!
//! Settings are read from a YAML file and turned into ready-to-run checks:
//!
//! ```
//! use std::path::Path;
//! use kafka_probes::config::parse_config;
//! use kafka_probes::shell::LocalExecutor;
//! use kafka_probes::validation::Validation;
//!
//! let config = parse_config("zookeeper_nodes: zk1:2181\n", Path::new("kafka.yml")).unwrap();
//! let check = config.consumer_lag_check(LocalExecutor);
//! assert_eq!(check.name(), "Kafka Consumer Lag Monitor");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{ConsumerLagSettings, KafkaProbesConfig, PartitionStatusSettings};
