// # Log Collaborators
//
// Stateless collaborators that turn every call into a tracing event.
//
// Events go to the `dispatch::alerts` and `dispatch::observers` targets, so
// they can be filtered separately from the rest of the process.

use crate::config::{AlertConsumerConfig, ObserverRegistryConfig};
use crate::model::{IdentityRef, ProfileGroup};
use crate::traits::{AlertConsumer, AlertConsumerFactory, ObserverRegistry, ObserverRegistryFactory};
use crate::Error;
use tracing::info;

/// Alert consumer that only logs what it was asked to recompute
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertConsumer;

impl AlertConsumer for LogAlertConsumer {
    fn update_for_identity(&self, identity: IdentityRef) -> Result<(), Error> {
        info!(target: "dispatch::alerts", %identity, "Recomputing alerts for identity");
        Ok(())
    }

    fn update_for_group(&self, group: &ProfileGroup) -> Result<(), Error> {
        info!(
            target: "dispatch::alerts",
            %group,
            identities = group.len(),
            "Recomputing alerts for group"
        );
        Ok(())
    }

    fn consumer_name(&self) -> &'static str {
        "log"
    }
}

/// Observer registry that only logs which group would be delivered
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserverRegistry;

impl ObserverRegistry for LogObserverRegistry {
    fn deliver_for_group(&self, group: &ProfileGroup) -> Result<(), Error> {
        info!(target: "dispatch::observers", %group, "Delivering snapshot for group");
        Ok(())
    }

    fn registry_name(&self) -> &'static str {
        "log"
    }
}

/// Factory for [`LogAlertConsumer`]
pub struct LogAlertConsumerFactory;

impl AlertConsumerFactory for LogAlertConsumerFactory {
    fn create(&self, _config: &AlertConsumerConfig) -> Result<Box<dyn AlertConsumer>, Error> {
        Ok(Box::new(LogAlertConsumer))
    }
}

/// Factory for [`LogObserverRegistry`]
pub struct LogObserverRegistryFactory;

impl ObserverRegistryFactory for LogObserverRegistryFactory {
    fn create(&self, _config: &ObserverRegistryConfig) -> Result<Box<dyn ObserverRegistry>, Error> {
        Ok(Box::new(LogObserverRegistry))
    }
}
