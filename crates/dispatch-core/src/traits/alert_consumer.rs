// # Alert Consumer Trait
//
// Defines the interface for recomputing user-facing alerts after a change.
//
// ## Implementations
//
// - Logging: `consumers::LogAlertConsumer`
// - In-memory counters: `consumers::MemoryAlertConsumer`
//
// ## Usage
//
// ```rust,ignore
// use dispatch_core::{AlertConsumer, IdentityRef, ProfileGroup};
//
// fn refresh(consumer: &dyn AlertConsumer) -> dispatch_core::Result<()> {
//     // Narrow recomputation to one identity
//     consumer.update_for_identity(IdentityRef::new(10))?;
//
//     // Or recompute for every identity in the group
//     consumer.update_for_group(&ProfileGroup::new(0.into(), [10.into()]))?;
//
//     Ok(())
// }
// ```

use crate::model::{IdentityRef, ProfileGroup};

/// Trait for alert consumer implementations
///
/// An alert consumer decides which alerts to post, update or withdraw for a
/// scope. The dispatcher only tells it *which* scope changed.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a dispatcher can be shared, but
/// the dispatcher never calls them concurrently on its own.
///
/// # Responsibilities
///
/// ## Owned by the consumer
/// - Rendering and deduplicating alerts
/// - Deciding whether anything actually needs to change
/// - Reporting failures as [`Error`](crate::Error)
///
/// ## Not owned by the consumer
/// - Delivering snapshots to observers (owned by `ObserverRegistry`)
/// - Ordering against delivery (owned by `ChangeDispatcher`)
/// - Retrying (nobody retries; the caller sees the error)
pub trait AlertConsumer: Send + Sync {
    /// Recompute alerts for a single identity
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Alerts are up to date for `identity`
    /// - `Err(Error)`: Recomputation failed
    fn update_for_identity(&self, identity: IdentityRef) -> Result<(), crate::Error>;

    /// Recompute alerts for every identity in a group
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Alerts are up to date for the whole group
    /// - `Err(Error)`: Recomputation failed
    fn update_for_group(&self, group: &ProfileGroup) -> Result<(), crate::Error>;

    /// Get the consumer name (for logging/debugging)
    fn consumer_name(&self) -> &'static str;
}

/// Helper trait for constructing alert consumers from configuration
pub trait AlertConsumerFactory: Send + Sync {
    /// Create an AlertConsumer instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this consumer
    fn create(
        &self,
        config: &crate::config::AlertConsumerConfig,
    ) -> Result<Box<dyn AlertConsumer>, crate::Error>;
}
