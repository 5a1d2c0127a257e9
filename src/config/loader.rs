//! Configuration file loading.

use std::fs;
use std::path::Path;

use crate::config::schema::KafkaProbesConfig;
use crate::error::{ProbeError, Result};

/// Load and validate a config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
/// Returns `ConfigValidationError` if a value is unusable.
pub fn load_config(path: &Path) -> Result<KafkaProbesConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProbeError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProbeError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse and validate YAML content.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<KafkaProbesConfig> {
    let config: KafkaProbesConfig =
        serde_yaml::from_str(content).map_err(|e| ProbeError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;

    config.validate()?;
    tracing::debug!(
        "Loaded Kafka probe config from {} (zookeeper: {})",
        source_path.display(),
        config.zookeeper_nodes
    );
    Ok(config)
}
