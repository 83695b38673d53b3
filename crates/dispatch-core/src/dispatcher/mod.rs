//! Change dispatcher
//!
//! The ChangeDispatcher is responsible for:
//! - Telling the AlertConsumer which scope changed
//! - Then telling the ObserverRegistry which group to redeliver
//!
//! ## Architecture
//!
//! ```text
//!   ChangeNotice (identity | group | groups)
//!                 │
//!                 ▼
//!        ┌──────────────────┐
//!        │ ChangeDispatcher │  one scope at a time, in input order
//!        └──────────────────┘
//!                 │
//!        ┌────────┴─────────┐
//!        │ 1                │ 2
//!        ▼                  ▼
//! ┌───────────────┐  ┌──────────────────┐
//! │ AlertConsumer │  │ ObserverRegistry │
//! │ identity|group│  │ group            │
//! └───────────────┘  └──────────────────┘
//! ```
//!
//! ## Failure Flow
//!
//! Errors are returned exactly as the collaborator produced them. A failed
//! alert update skips that scope's delivery, and a failed scope stops a
//! multi-group notice where it is. Groups already dispatched stay dispatched.

use crate::config::DispatchConfig;
use crate::error::Result;
use crate::model::{ChangeNotice, IdentityRef, ProfileGroup};
use crate::registry::CollaboratorRegistry;
use crate::traits::{AlertConsumer, ObserverRegistry};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// How far the alert recomputation reaches for one dispatched scope
///
/// Delivery is always group-wide; only the alert side narrows.
#[derive(Debug, Clone, Copy)]
enum AlertScope {
    Identity(IdentityRef),
    Group,
}

/// Routes change notices to the alert consumer and the observer registry
///
/// ## Ordering
///
/// For every scope the alert consumer runs first and the observer registry
/// second, so observers never receive a snapshot that predates the alert
/// recomputation.
///
/// ## Threading
///
/// Calls run synchronously on the caller's thread. The dispatcher holds no
/// lock and no queue; callers sharing it across threads serialize calls
/// themselves if their collaborators need it.
pub struct ChangeDispatcher {
    alerts: Arc<dyn AlertConsumer>,
    observers: Arc<dyn ObserverRegistry>,
}

impl ChangeDispatcher {
    /// Create a dispatcher over the given collaborators
    ///
    /// Both handles are kept for the dispatcher's whole lifetime.
    pub fn new(alerts: Arc<dyn AlertConsumer>, observers: Arc<dyn ObserverRegistry>) -> Self {
        Self { alerts, observers }
    }

    /// Create a dispatcher whose collaborators are built from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeDispatcher)`: Both collaborators were created
    /// - `Err(Error)`: Invalid config, unknown collaborator type, or factory failure
    pub fn from_config(config: &DispatchConfig, registry: &CollaboratorRegistry) -> Result<Self> {
        config.validate()?;

        let alerts = registry.create_alert_consumer(&config.alert_consumer)?;
        let observers = registry.create_observer_registry(&config.observer_registry)?;

        Ok(Self::new(Arc::from(alerts), Arc::from(observers)))
    }

    /// Dispatch a change to a single identity within `group`
    ///
    /// Alerts are recomputed for `identity` only; observers of the whole
    /// `group` get a fresh snapshot. `identity` must belong to `group`;
    /// this is not checked.
    pub fn notify_identity(&self, group: &ProfileGroup, identity: IdentityRef) -> Result<()> {
        self.dispatch(group, AlertScope::Identity(identity))
    }

    /// Dispatch a change to every identity in `group`
    pub fn notify_group(&self, group: &ProfileGroup) -> Result<()> {
        self.dispatch(group, AlertScope::Group)
    }

    /// Dispatch a change to each group in order
    ///
    /// Each group is fully dispatched before the next one starts. Duplicates
    /// are dispatched again. The first error stops the walk and is returned.
    pub fn notify_groups<'a>(
        &self,
        groups: impl IntoIterator<Item = &'a ProfileGroup>,
    ) -> Result<()> {
        for group in groups {
            self.notify_group(group)?;
        }
        Ok(())
    }

    /// Dispatch a change notice at whatever scope it carries
    pub fn notify(&self, notice: &ChangeNotice) -> Result<()> {
        match notice {
            ChangeNotice::Identity { group, identity } => self.notify_identity(group, *identity),
            ChangeNotice::Group { group } => self.notify_group(group),
            ChangeNotice::Groups { groups } => self.notify_groups(groups),
        }
    }

    /// Alerts for the scope, then delivery for the group
    fn dispatch(&self, group: &ProfileGroup, scope: AlertScope) -> Result<()> {
        trace!(%group, ?scope, "dispatching change");

        match scope {
            AlertScope::Identity(identity) => self.alerts.update_for_identity(identity)?,
            AlertScope::Group => self.alerts.update_for_group(group)?,
        }

        self.observers.deliver_for_group(group)
    }
}

impl fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDispatcher")
            .field("alerts", &self.alerts.consumer_name())
            .field("observers", &self.observers.registry_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlertConsumerConfig, ObserverRegistryConfig};
    use crate::error::Error;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Trace(Mutex<Vec<String>>);

    impl AlertConsumer for Trace {
        fn update_for_identity(&self, identity: IdentityRef) -> Result<()> {
            self.0.lock().unwrap().push(format!("alerts:{identity}"));
            Ok(())
        }

        fn update_for_group(&self, group: &ProfileGroup) -> Result<()> {
            self.0.lock().unwrap().push(format!("alerts:{group}"));
            Ok(())
        }

        fn consumer_name(&self) -> &'static str {
            "trace"
        }
    }

    impl ObserverRegistry for Trace {
        fn deliver_for_group(&self, group: &ProfileGroup) -> Result<()> {
            self.0.lock().unwrap().push(format!("deliver:{group}"));
            Ok(())
        }

        fn registry_name(&self) -> &'static str {
            "trace"
        }
    }

    #[test]
    fn test_notice_routing() {
        let trace = Arc::new(Trace::default());
        let dispatcher = ChangeDispatcher::new(trace.clone(), trace.clone());
        let group = ProfileGroup::new(0.into(), [10.into()]);

        dispatcher
            .notify(&ChangeNotice::identity(group.clone(), 10.into()))
            .unwrap();
        dispatcher.notify(&ChangeNotice::group(group.clone())).unwrap();
        dispatcher.notify(&ChangeNotice::groups(Vec::new())).unwrap();

        assert_eq!(
            *trace.0.lock().unwrap(),
            vec![
                "alerts:10",
                "deliver:group(0; 10)",
                "alerts:group(0; 10)",
                "deliver:group(0; 10)",
            ]
        );
    }

    #[test]
    fn test_from_config_unknown_type() {
        let registry = CollaboratorRegistry::with_builtins();
        let config = DispatchConfig {
            alert_consumer: AlertConsumerConfig::Custom {
                factory: "missing".to_string(),
                config: serde_json::json!({}),
            },
            observer_registry: ObserverRegistryConfig::Memory,
        };

        let err = ChangeDispatcher::from_config(&config, &registry).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_names_collaborators() {
        let dispatcher = ChangeDispatcher::from_config(
            &DispatchConfig::default(),
            &CollaboratorRegistry::with_builtins(),
        )
        .unwrap();

        let rendered = format!("{dispatcher:?}");
        assert!(rendered.contains("alerts: \"log\""));
        assert!(rendered.contains("observers: \"log\""));
    }
}
