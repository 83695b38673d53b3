// # Memory Alert Consumer
//
// In-memory implementation of AlertConsumer.
//
// ## Purpose
//
// Counts how often alerts were recomputed for each identity and each group.
// Nothing is rendered or posted. Useful for embedding tests and for the
// daemon's end-of-run summary.
//
// ## Sharing
//
// The consumer is a cheap handle over shared counters: clone it, hand one
// clone to the dispatcher, and read the counters from the other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::AlertConsumerConfig;
use crate::model::{IdentityRef, ProfileGroup};
use crate::traits::{AlertConsumer, AlertConsumerFactory};
use crate::Error;

#[derive(Debug, Default)]
struct Counters {
    identities: HashMap<IdentityRef, u64>,
    groups: HashMap<ProfileGroup, u64>,
}

/// In-memory alert consumer that counts recomputation requests
///
/// # Example
///
/// ```rust
/// use dispatch_core::{AlertConsumer, IdentityRef, MemoryAlertConsumer};
///
/// let consumer = MemoryAlertConsumer::new();
/// consumer.update_for_identity(IdentityRef::new(10)).unwrap();
///
/// assert_eq!(consumer.identity_updates(IdentityRef::new(10)), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertConsumer {
    inner: Arc<Mutex<Counters>>,
}

impl MemoryAlertConsumer {
    /// Create a new consumer with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// How many identity-scoped recomputations `identity` has seen
    pub fn identity_updates(&self, identity: IdentityRef) -> u64 {
        self.counters().identities.get(&identity).copied().unwrap_or(0)
    }

    /// How many group-scoped recomputations `group` has seen
    pub fn group_updates(&self, group: &ProfileGroup) -> u64 {
        self.counters().groups.get(group).copied().unwrap_or(0)
    }

    /// Total recomputations across all scopes
    pub fn total_updates(&self) -> u64 {
        let counters = self.counters();
        counters.identities.values().sum::<u64>() + counters.groups.values().sum::<u64>()
    }

    /// Reset every counter
    pub fn clear(&self) {
        let mut counters = self.counters();
        counters.identities.clear();
        counters.groups.clear();
    }

    fn counters(&self) -> MutexGuard<'_, Counters> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlertConsumer for MemoryAlertConsumer {
    fn update_for_identity(&self, identity: IdentityRef) -> Result<(), Error> {
        *self.counters().identities.entry(identity).or_insert(0) += 1;
        Ok(())
    }

    fn update_for_group(&self, group: &ProfileGroup) -> Result<(), Error> {
        *self.counters().groups.entry(group.clone()).or_insert(0) += 1;
        Ok(())
    }

    fn consumer_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for [`MemoryAlertConsumer`]
///
/// By default every `create` returns a fresh consumer. [`sharing`](Self::sharing)
/// makes every created consumer a clone of one handle instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertConsumerFactory {
    shared: Option<MemoryAlertConsumer>,
}

impl MemoryAlertConsumerFactory {
    /// Factory whose consumers all share `consumer`'s counters
    pub fn sharing(consumer: MemoryAlertConsumer) -> Self {
        Self {
            shared: Some(consumer),
        }
    }
}

impl AlertConsumerFactory for MemoryAlertConsumerFactory {
    fn create(&self, _config: &AlertConsumerConfig) -> Result<Box<dyn AlertConsumer>, Error> {
        Ok(Box::new(self.shared.clone().unwrap_or_default()))
    }
}
