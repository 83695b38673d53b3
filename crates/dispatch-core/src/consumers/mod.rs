// # Built-in Collaborators
//
// Implementations of the collaborator traits that ship with the crate.
//
// - `log`: emit one structured tracing event per call, keep no state
// - `memory`: keep counters or per-group subscriptions in memory
//
// Real deployments usually register their own consumers through the
// `CollaboratorRegistry`; these cover local runs and embedding tests.

pub mod logging;
pub mod memory;
pub mod observers;

pub use logging::{
    LogAlertConsumer, LogAlertConsumerFactory, LogObserverRegistry, LogObserverRegistryFactory,
};
pub use memory::{MemoryAlertConsumer, MemoryAlertConsumerFactory};
pub use observers::{
    Delivery, MemoryObserverRegistry, MemoryObserverRegistryFactory, Observer, SubscriptionId,
};
