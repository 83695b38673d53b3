//! Test doubles and common utilities for architecture contract tests
//!
//! Both doubles append to one shared call trace, so a test can assert the
//! exact interleaving of alert updates and deliveries.

#![allow(dead_code)]

use dispatch_core::error::{Error, Result};
use dispatch_core::{AlertConsumer, ChangeDispatcher, IdentityRef, ObserverRegistry, ProfileGroup};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One collaborator invocation, as seen by the test doubles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AlertUpdateForIdentity(IdentityRef),
    AlertUpdate(ProfileGroup),
    Deliver(ProfileGroup),
}

/// Shared, ordered record of collaborator calls
#[derive(Debug, Clone, Default)]
pub struct CallTrace(Arc<Mutex<Vec<Call>>>);

impl CallTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    /// Snapshot of every call so far
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

/// What a double should do when called for a particular scope
#[derive(Debug, Clone, Default)]
pub struct FailurePlan {
    groups: Vec<ProfileGroup>,
    identities: Vec<IdentityRef>,
}

impl FailurePlan {
    pub fn fail_group(mut self, group: ProfileGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn fail_identity(mut self, identity: IdentityRef) -> Self {
        self.identities.push(identity);
        self
    }
}

/// An AlertConsumer that records calls and fails on request
pub struct RecordingAlertConsumer {
    trace: CallTrace,
    plan: FailurePlan,
    call_count: Arc<AtomicUsize>,
}

impl RecordingAlertConsumer {
    pub fn new(trace: CallTrace) -> Self {
        Self::failing(trace, FailurePlan::default())
    }

    pub fn failing(trace: CallTrace, plan: FailurePlan) -> Self {
        Self {
            trace,
            plan,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times either update method was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl AlertConsumer for RecordingAlertConsumer {
    fn update_for_identity(&self, identity: IdentityRef) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.trace.push(Call::AlertUpdateForIdentity(identity));
        if self.plan.identities.contains(&identity) {
            return Err(Error::alert_consumer(format!("cannot render alerts for {identity}")));
        }
        Ok(())
    }

    fn update_for_group(&self, group: &ProfileGroup) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.trace.push(Call::AlertUpdate(group.clone()));
        if self.plan.groups.contains(group) {
            return Err(Error::alert_consumer(format!("cannot render alerts for {group}")));
        }
        Ok(())
    }

    fn consumer_name(&self) -> &'static str {
        "recording"
    }
}

/// An ObserverRegistry that records calls and fails on request
pub struct RecordingObserverRegistry {
    trace: CallTrace,
    plan: FailurePlan,
}

impl RecordingObserverRegistry {
    pub fn new(trace: CallTrace) -> Self {
        Self::failing(trace, FailurePlan::default())
    }

    pub fn failing(trace: CallTrace, plan: FailurePlan) -> Self {
        Self { trace, plan }
    }
}

impl ObserverRegistry for RecordingObserverRegistry {
    fn deliver_for_group(&self, group: &ProfileGroup) -> Result<()> {
        self.trace.push(Call::Deliver(group.clone()));
        if self.plan.groups.contains(group) {
            return Err(Error::observer_registry(format!("listener for {group} died")));
        }
        Ok(())
    }

    fn registry_name(&self) -> &'static str {
        "recording"
    }
}

/// Dispatcher over two recording doubles sharing one trace
pub fn recording_dispatcher() -> (ChangeDispatcher, CallTrace) {
    let trace = CallTrace::new();
    let dispatcher = ChangeDispatcher::new(
        Arc::new(RecordingAlertConsumer::new(trace.clone())),
        Arc::new(RecordingObserverRegistry::new(trace.clone())),
    );
    (dispatcher, trace)
}

/// Dispatcher whose collaborators fail according to the given plans
pub fn failing_dispatcher(
    alert_plan: FailurePlan,
    delivery_plan: FailurePlan,
) -> (ChangeDispatcher, CallTrace) {
    let trace = CallTrace::new();
    let dispatcher = ChangeDispatcher::new(
        Arc::new(RecordingAlertConsumer::failing(trace.clone(), alert_plan)),
        Arc::new(RecordingObserverRegistry::failing(trace.clone(), delivery_plan)),
    );
    (dispatcher, trace)
}

/// Parent 0 with managed identities 7 and 10
pub fn group_a() -> ProfileGroup {
    ProfileGroup::new(IdentityRef::new(0), [IdentityRef::new(7), IdentityRef::new(10)])
}

/// A second, unrelated group
pub fn group_b() -> ProfileGroup {
    ProfileGroup::new(IdentityRef::new(11), [IdentityRef::new(12)])
}

/// A third, single-identity group
pub fn group_c() -> ProfileGroup {
    ProfileGroup::single(IdentityRef::new(20))
}
