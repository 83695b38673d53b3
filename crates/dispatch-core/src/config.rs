//! Configuration types for the dispatcher
//!
//! A [`DispatchConfig`] names which alert consumer and which observer
//! registry to build. Collaborators are resolved by type name through the
//! [`CollaboratorRegistry`](crate::CollaboratorRegistry).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main dispatcher configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Alert consumer configuration
    #[serde(default)]
    pub alert_consumer: AlertConsumerConfig,

    /// Observer registry configuration
    #[serde(default)]
    pub observer_registry: ObserverRegistryConfig,
}

impl DispatchConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.alert_consumer.validate()?;
        self.observer_registry.validate()?;
        Ok(())
    }
}

/// Alert consumer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertConsumerConfig {
    /// Emit a tracing event per recomputation request
    #[default]
    Log,

    /// Count recomputation requests in memory
    Memory,

    /// Custom alert consumer
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl AlertConsumerConfig {
    /// Validate the alert consumer configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            AlertConsumerConfig::Custom { factory, config } => {
                validate_custom("alert consumer", factory, config)
            }
            AlertConsumerConfig::Log | AlertConsumerConfig::Memory => Ok(()),
        }
    }

    /// Get the alert consumer type name
    pub fn type_name(&self) -> &str {
        match self {
            AlertConsumerConfig::Log => "log",
            AlertConsumerConfig::Memory => "memory",
            AlertConsumerConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Observer registry configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObserverRegistryConfig {
    /// Emit a tracing event per delivery
    #[default]
    Log,

    /// In-memory per-group subscriptions
    Memory,

    /// Custom observer registry
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ObserverRegistryConfig {
    /// Validate the observer registry configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ObserverRegistryConfig::Custom { factory, config } => {
                validate_custom("observer registry", factory, config)
            }
            ObserverRegistryConfig::Log | ObserverRegistryConfig::Memory => Ok(()),
        }
    }

    /// Get the observer registry type name
    pub fn type_name(&self) -> &str {
        match self {
            ObserverRegistryConfig::Log => "log",
            ObserverRegistryConfig::Memory => "memory",
            ObserverRegistryConfig::Custom { factory, .. } => factory,
        }
    }
}

fn validate_custom(
    kind: &str,
    factory: &str,
    config: &serde_json::Value,
) -> Result<(), crate::Error> {
    if factory.is_empty() {
        return Err(crate::Error::config(format!(
            "Custom {kind} factory cannot be empty"
        )));
    }
    if config.is_null() {
        return Err(crate::Error::config(format!(
            "Custom {kind} config cannot be null"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DispatchConfig::default());
        assert_eq!(config.alert_consumer.type_name(), "log");
        assert_eq!(config.observer_registry.type_name(), "log");
    }

    #[test]
    fn test_parse_custom() {
        let config = DispatchConfig::from_json_str(
            r#"{
                "alert_consumer": { "type": "custom", "factory": "push", "config": { "channel": "safety" } },
                "observer_registry": { "type": "memory" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.alert_consumer.type_name(), "push");
        assert_eq!(config.observer_registry, ObserverRegistryConfig::Memory);
    }

    #[test]
    fn test_validate_rejects_empty_factory() {
        let config = DispatchConfig {
            alert_consumer: AlertConsumerConfig::Log,
            observer_registry: ObserverRegistryConfig::Custom {
                factory: String::new(),
                config: serde_json::json!({}),
            },
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        let config = DispatchConfig {
            alert_consumer: AlertConsumerConfig::Custom {
                factory: "push".to_string(),
                config: serde_json::Value::Null,
            },
            observer_registry: ObserverRegistryConfig::Log,
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "alert_consumer": {{ "type": "memory" }} }}"#
        )
        .unwrap();

        let config = DispatchConfig::load(file.path()).unwrap();
        assert_eq!(config.alert_consumer, AlertConsumerConfig::Memory);
        assert_eq!(config.observer_registry, ObserverRegistryConfig::Log);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DispatchConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
