// # Observer Registry Trait
//
// Defines the interface for pushing the current state of a profile group to
// everyone observing it.
//
// ## Implementations
//
// - Logging: `consumers::LogObserverRegistry`
// - In-memory subscriptions: `consumers::MemoryObserverRegistry`
//
// Observers subscribe per group, never per identity, so delivery always takes
// a whole group.

use crate::model::ProfileGroup;

/// Trait for observer registry implementations
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Subscription bookkeeping is the
/// registry's own business; the dispatcher never looks inside.
///
/// # Responsibilities
///
/// ## Owned by the registry
/// - Tracking which observers watch which group
/// - Building the snapshot handed to observers
/// - Reporting delivery failures as [`Error`](crate::Error)
///
/// ## Not owned by the registry
/// - Recomputing alerts (owned by `AlertConsumer`, and always done first)
/// - Deciding when a change happened (owned by the caller)
pub trait ObserverRegistry: Send + Sync {
    /// Deliver the current snapshot of `group` to all of its observers
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Every observer of the group received the snapshot
    /// - `Err(Error)`: Delivery failed
    fn deliver_for_group(&self, group: &ProfileGroup) -> Result<(), crate::Error>;

    /// Get the registry name (for logging/debugging)
    fn registry_name(&self) -> &'static str;
}

/// Helper trait for constructing observer registries from configuration
pub trait ObserverRegistryFactory: Send + Sync {
    /// Create an ObserverRegistry instance from configuration
    fn create(
        &self,
        config: &crate::config::ObserverRegistryConfig,
    ) -> Result<Box<dyn ObserverRegistry>, crate::Error>;
}
