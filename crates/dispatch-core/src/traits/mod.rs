//! Collaborator traits for the dispatcher
//!
//! This module defines the two entry points the dispatcher invokes.
//!
//! - [`AlertConsumer`]: Recompute user-facing alerts for an identity or group
//! - [`ObserverRegistry`]: Deliver the current group snapshot to its observers

pub mod alert_consumer;
pub mod observer_registry;

pub use alert_consumer::{AlertConsumer, AlertConsumerFactory};
pub use observer_registry::{ObserverRegistry, ObserverRegistryFactory};
