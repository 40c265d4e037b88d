//! Configuration schema (schemascribe.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connection settings for the reference database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection type (currently "fixture")
    #[serde(rename = "type")]
    pub connection_type: String,

    /// Schemas to capture from the reference side
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Connection-specific settings
    #[serde(flatten)]
    pub settings: HashMap<String, String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_type: "fixture".to_string(),
            schemas: Vec::new(),
            settings: HashMap::new(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default change-set author when none is given on the command line
    #[serde(default)]
    pub author: Option<String>,

    /// Default change-set context when none is given on the command line
    #[serde(default)]
    pub context: Option<String>,

    /// Reference connection settings
    #[serde(default)]
    pub connection: Option<ConnectionConfig>,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Load config from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to a TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.author.is_none());
        assert!(config.connection.is_none());
    }

    #[test]
    fn parse_connection_section() {
        let config = Config::from_toml(
            r#"
            author = "alice"

            [connection]
            type = "fixture"
            schemas = ["public"]
            path = "catalog.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.author.as_deref(), Some("alice"));
        let conn = config.connection.unwrap();
        assert_eq!(conn.connection_type, "fixture");
        assert_eq!(conn.schemas, vec!["public"]);
        assert_eq!(conn.settings.get("path").map(String::as_str), Some("catalog.json"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config {
            author: Some("alice".to_string()),
            context: None,
            connection: Some(ConnectionConfig::default()),
        };
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }
}
