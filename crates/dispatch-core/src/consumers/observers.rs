// # Memory Observer Registry
//
// In-memory implementation of ObserverRegistry.
//
// ## Subscriptions
//
// Observers subscribe to one profile group at a time. Groups are matched by
// identity-set membership, so a subscription made with `group(0; 10)` also
// receives deliveries for `group(10; 0)`.
//
// ## Delivery
//
// Each delivery carries a registry-wide sequence number and a UTC timestamp.
// Observers of the group are called in subscription order; the first failure
// stops the delivery and is reported as `Error::Delivery`. The subscription
// table is not locked while observers run, so an observer may subscribe or
// unsubscribe from inside its callback.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ObserverRegistryConfig;
use crate::model::ProfileGroup;
use crate::traits::{ObserverRegistry, ObserverRegistryFactory};
use crate::Error;

/// Snapshot handed to every observer of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// The group whose state changed
    pub group: ProfileGroup,
    /// Registry-wide delivery counter, starting at 1
    pub sequence: u64,
    /// When the delivery was built
    pub delivered_at: DateTime<Utc>,
}

/// Receiver of group snapshots
pub trait Observer: Send + Sync {
    /// Handle one delivery
    fn on_delivery(&self, delivery: &Delivery) -> Result<(), Error>;

    /// Observer name used in delivery errors
    fn name(&self) -> &str {
        "anonymous"
    }
}

impl<F> Observer for F
where
    F: Fn(&Delivery) -> Result<(), Error> + Send + Sync,
{
    fn on_delivery(&self, delivery: &Delivery) -> Result<(), Error> {
        self(delivery)
    }
}

/// Handle returned by [`MemoryObserverRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Subscriptions = HashMap<ProfileGroup, Vec<(SubscriptionId, Arc<dyn Observer>)>>;

#[derive(Default)]
struct Inner {
    subscriptions: RwLock<Subscriptions>,
    next_subscription: AtomicU64,
    sequence: AtomicU64,
}

/// In-memory observer registry keyed by profile group
///
/// Clones share the same subscription table.
///
/// # Example
///
/// ```rust
/// use dispatch_core::consumers::{Delivery, MemoryObserverRegistry};
/// use dispatch_core::{ObserverRegistry, ProfileGroup};
///
/// let registry = MemoryObserverRegistry::new();
/// let group = ProfileGroup::single(0.into());
///
/// registry.subscribe(
///     group.clone(),
///     std::sync::Arc::new(|delivery: &Delivery| -> dispatch_core::Result<()> {
///         println!("snapshot #{} for {}", delivery.sequence, delivery.group);
///         Ok(())
///     }),
/// );
///
/// registry.deliver_for_group(&group).unwrap();
/// assert_eq!(registry.deliveries(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryObserverRegistry {
    inner: Arc<Inner>,
}

impl MemoryObserverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `observer` to deliveries for `group`
    pub fn subscribe(&self, group: ProfileGroup, observer: Arc<dyn Observer>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::SeqCst));
        debug!("Subscribing {} ({}) to {}", observer.name(), id, group);

        let mut subscriptions = self
            .inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions.entry(group).or_default().push((id, observer));
        id
    }

    /// Remove a subscription
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The subscription was removed
    /// - `Err(Error::NotFound)`: No such subscription
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), Error> {
        let mut subscriptions = self
            .inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let group = subscriptions
            .iter()
            .find(|(_, observers)| observers.iter().any(|(sub, _)| *sub == id))
            .map(|(group, _)| group.clone())
            .ok_or_else(|| Error::not_found(format!("subscription {id}")))?;

        if let Some(observers) = subscriptions.get_mut(&group) {
            observers.retain(|(sub, _)| *sub != id);
            if observers.is_empty() {
                subscriptions.remove(&group);
            }
        }
        Ok(())
    }

    /// Number of observers subscribed to `group`
    pub fn observer_count(&self, group: &ProfileGroup) -> usize {
        let subscriptions = self
            .inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions.get(group).map_or(0, Vec::len)
    }

    /// Number of deliveries built so far
    pub fn deliveries(&self) -> u64 {
        self.inner.sequence.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for MemoryObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = self
            .inner
            .subscriptions
            .read()
            .map(|subscriptions| subscriptions.len())
            .unwrap_or_default();
        f.debug_struct("MemoryObserverRegistry")
            .field("groups", &groups)
            .field("deliveries", &self.deliveries())
            .finish()
    }
}

impl ObserverRegistry for MemoryObserverRegistry {
    fn deliver_for_group(&self, group: &ProfileGroup) -> Result<(), Error> {
        let observers: Vec<Arc<dyn Observer>> = {
            let subscriptions = self
                .inner
                .subscriptions
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match subscriptions.get(group) {
                Some(observers) => observers.iter().map(|(_, o)| Arc::clone(o)).collect(),
                None => {
                    debug!("No observers for {}, skipping delivery", group);
                    return Ok(());
                }
            }
        };

        let delivery = Delivery {
            group: group.clone(),
            sequence: self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            delivered_at: Utc::now(),
        };

        for observer in observers {
            if let Err(e) = observer.on_delivery(&delivery) {
                warn!(
                    "Observer {} rejected delivery #{} for {}: {}",
                    observer.name(),
                    delivery.sequence,
                    group,
                    e
                );
                return Err(Error::delivery(observer.name(), e.to_string()));
            }
        }

        debug!("Delivered snapshot #{} for {}", delivery.sequence, group);
        Ok(())
    }

    fn registry_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for [`MemoryObserverRegistry`]
///
/// By default every `create` returns a fresh registry. [`sharing`](Self::sharing)
/// hands out clones of one registry so callers can keep subscribing to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryObserverRegistryFactory {
    shared: Option<MemoryObserverRegistry>,
}

impl MemoryObserverRegistryFactory {
    /// Factory whose registries all share `registry`'s subscriptions
    pub fn sharing(registry: MemoryObserverRegistry) -> Self {
        Self {
            shared: Some(registry),
        }
    }
}

impl ObserverRegistryFactory for MemoryObserverRegistryFactory {
    fn create(&self, _config: &ObserverRegistryConfig) -> Result<Box<dyn ObserverRegistry>, Error> {
        Ok(Box::new(self.shared.clone().unwrap_or_default()))
    }
}
