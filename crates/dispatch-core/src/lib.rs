// # dispatch-core
//
// Core library for the change-notification dispatcher.
//
// ## Architecture Overview
//
// Whenever the state behind one or more profile groups changes, every
// consumer that depends on that state has to hear about it:
// - **AlertConsumer**: Trait for recomputing user-facing alerts for a scope
// - **ObserverRegistry**: Trait for delivering group snapshots to observers
// - **ChangeDispatcher**: Routes a change notice to both collaborators, alerts first
// - **CollaboratorRegistry**: Plugin-based registry for building collaborators from config
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The dispatcher only routes; collaborators own their state
// 2. **Fixed Ordering**: Alerts are recomputed before observers see a snapshot
// 3. **Transparent Failures**: Collaborator errors reach the caller untouched
// 4. **Library-First**: The daemon is a thin shell over this crate

pub mod config;
pub mod consumers;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{AlertConsumerConfig, DispatchConfig, ObserverRegistryConfig};
pub use consumers::{
    LogAlertConsumer, LogObserverRegistry, MemoryAlertConsumer, MemoryObserverRegistry,
};
pub use dispatcher::ChangeDispatcher;
pub use error::{Error, Result};
pub use model::{ChangeNotice, IdentityRef, ProfileGroup};
pub use registry::CollaboratorRegistry;
pub use traits::{AlertConsumer, ObserverRegistry};
