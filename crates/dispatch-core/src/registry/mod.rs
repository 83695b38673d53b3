//! Plugin-based collaborator registry
//!
//! The registry lets alert consumers and observer registries be chosen by
//! name at runtime instead of through hardcoded match arms.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dispatch_core::{ChangeDispatcher, CollaboratorRegistry, DispatchConfig};
//!
//! // Start from the built-in "log" and "memory" collaborators
//! let registry = CollaboratorRegistry::with_builtins();
//!
//! // Add your own
//! registry.register_alert_consumer("push", Box::new(PushAlertsFactory));
//!
//! let dispatcher = ChangeDispatcher::from_config(&config, &registry)?;
//! ```

use crate::config::{AlertConsumerConfig, ObserverRegistryConfig};
use crate::consumers::{
    LogAlertConsumerFactory, LogObserverRegistryFactory, MemoryAlertConsumerFactory,
    MemoryObserverRegistryFactory,
};
use crate::error::{Error, Result};
use crate::traits::{AlertConsumer, AlertConsumerFactory, ObserverRegistry, ObserverRegistryFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Registry for plugin-based collaborator creation
///
/// Maps collaborator type names to factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct CollaboratorRegistry {
    /// Registered alert consumer factories
    alert_consumers: RwLock<HashMap<String, Box<dyn AlertConsumerFactory>>>,

    /// Registered observer registry factories
    observer_registries: RwLock<HashMap<String, Box<dyn ObserverRegistryFactory>>>,
}

impl CollaboratorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `log` and `memory` collaborators
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_alert_consumer("log", Box::new(LogAlertConsumerFactory));
        registry.register_alert_consumer("memory", Box::new(MemoryAlertConsumerFactory::default()));
        registry.register_observer_registry("log", Box::new(LogObserverRegistryFactory));
        registry.register_observer_registry(
            "memory",
            Box::new(MemoryObserverRegistryFactory::default()),
        );
        registry
    }

    /// Register an alert consumer factory
    ///
    /// Registering an existing name replaces the previous factory.
    pub fn register_alert_consumer(
        &self,
        name: impl Into<String>,
        factory: Box<dyn AlertConsumerFactory>,
    ) {
        let name = name.into();
        debug!("Registering alert consumer factory {}", name);
        let mut consumers = self
            .alert_consumers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        consumers.insert(name, factory);
    }

    /// Register an observer registry factory
    ///
    /// Registering an existing name replaces the previous factory.
    pub fn register_observer_registry(
        &self,
        name: impl Into<String>,
        factory: Box<dyn ObserverRegistryFactory>,
    ) {
        let name = name.into();
        debug!("Registering observer registry factory {}", name);
        let mut registries = self
            .observer_registries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registries.insert(name, factory);
    }

    /// Create an alert consumer from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn AlertConsumer>)`: Created consumer instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_alert_consumer(
        &self,
        config: &AlertConsumerConfig,
    ) -> Result<Box<dyn AlertConsumer>> {
        let consumer_type = config.type_name();
        let consumers = self
            .alert_consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = consumers.get(consumer_type).ok_or_else(|| {
            Error::config(format!("Unknown alert consumer type: {}", consumer_type))
        })?;

        factory.create(config)
    }

    /// Create an observer registry from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ObserverRegistry>)`: Created registry instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_observer_registry(
        &self,
        config: &ObserverRegistryConfig,
    ) -> Result<Box<dyn ObserverRegistry>> {
        let registry_type = config.type_name();
        let registries = self
            .observer_registries
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = registries.get(registry_type).ok_or_else(|| {
            Error::config(format!("Unknown observer registry type: {}", registry_type))
        })?;

        factory.create(config)
    }

    /// List all registered alert consumer types, sorted
    pub fn list_alert_consumers(&self) -> Vec<String> {
        let consumers = self
            .alert_consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = consumers.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered observer registry types, sorted
    pub fn list_observer_registries(&self) -> Vec<String> {
        let registries = self
            .observer_registries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = registries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if an alert consumer type is registered
    pub fn has_alert_consumer(&self, name: &str) -> bool {
        let consumers = self
            .alert_consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        consumers.contains_key(name)
    }

    /// Check if an observer registry type is registered
    pub fn has_observer_registry(&self, name: &str) -> bool {
        let registries = self
            .observer_registries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        registries.contains_key(name)
    }
}
