//! Architectural Contract Test: Transparent Failure Propagation
//!
//! This test verifies that collaborator errors reach the caller untouched
//! and stop the dispatch at the point of failure.
//!
//! Constraints verified:
//! - A failed alert update prevents that scope's delivery
//! - A failure on group k stops groups k+1..n
//! - The error is returned unchanged (same variant, same message)
//! - Nothing is retried
//! - Groups before the failure stay dispatched (no rollback)
//!
//! Architectural boundaries:
//! - ✅ CALLER: decides what a failed notice means
//! - ❌ DISPATCHER: must not catch, wrap, log-and-continue, or retry
//!
//! If this test fails, someone has added a continue-on-error policy,
//! error translation, or hidden retries to the dispatcher.

mod common;

use common::*;
use dispatch_core::error::Error;
use dispatch_core::{ChangeNotice, IdentityRef};

#[test]
fn alert_failure_on_first_group_stops_everything() {
    let (dispatcher, trace) = failing_dispatcher(
        FailurePlan::default().fail_group(group_a()),
        FailurePlan::default(),
    );

    let err = dispatcher
        .notify_groups(&[group_a(), group_b()])
        .expect_err("alert failure propagates");

    assert_eq!(trace.calls(), vec![Call::AlertUpdate(group_a())]);
    assert_eq!(
        err.to_string(),
        format!("Alert consumer error: cannot render alerts for {}", group_a())
    );
}

#[test]
fn alert_failure_mid_batch_keeps_earlier_groups_dispatched() {
    let (dispatcher, trace) = failing_dispatcher(
        FailurePlan::default().fail_group(group_b()),
        FailurePlan::default(),
    );

    let err = dispatcher
        .notify_groups(&[group_a(), group_b(), group_c()])
        .expect_err("alert failure propagates");

    assert!(matches!(err, Error::AlertConsumer(_)));
    assert_eq!(
        trace.calls(),
        vec![
            Call::AlertUpdate(group_a()),
            Call::Deliver(group_a()),
            Call::AlertUpdate(group_b()),
        ]
    );
}

#[test]
fn delivery_failure_stops_later_groups() {
    let (dispatcher, trace) = failing_dispatcher(
        FailurePlan::default(),
        FailurePlan::default().fail_group(group_a()),
    );

    let err = dispatcher
        .notify_groups(&[group_a(), group_b()])
        .expect_err("delivery failure propagates");

    assert!(matches!(err, Error::ObserverRegistry(ref msg) if msg.contains("died")));
    assert_eq!(
        trace.calls(),
        vec![Call::AlertUpdate(group_a()), Call::Deliver(group_a())]
    );
}

#[test]
fn identity_alert_failure_skips_delivery() {
    let (dispatcher, trace) = failing_dispatcher(
        FailurePlan::default().fail_identity(IdentityRef::new(7)),
        FailurePlan::default(),
    );

    let err = dispatcher
        .notify(&ChangeNotice::identity(group_a(), IdentityRef::new(7)))
        .expect_err("alert failure propagates");

    assert!(matches!(err, Error::AlertConsumer(ref msg) if msg.ends_with("for 7")));
    assert_eq!(
        trace.calls(),
        vec![Call::AlertUpdateForIdentity(IdentityRef::new(7))]
    );
}

#[test]
fn failures_are_not_retried() {
    let trace = CallTrace::new();
    let alerts = std::sync::Arc::new(RecordingAlertConsumer::failing(
        trace.clone(),
        FailurePlan::default().fail_group(group_c()),
    ));
    let dispatcher = dispatch_core::ChangeDispatcher::new(
        alerts.clone(),
        std::sync::Arc::new(RecordingObserverRegistry::new(trace.clone())),
    );

    assert!(dispatcher.notify_group(&group_c()).is_err());
    assert_eq!(alerts.call_count(), 1);

    // The dispatcher keeps no state from the failed call
    dispatcher
        .notify_group(&group_a())
        .expect("later notices still dispatch");
    assert_eq!(alerts.call_count(), 2);
    assert_eq!(
        trace.calls(),
        vec![
            Call::AlertUpdate(group_c()),
            Call::AlertUpdate(group_a()),
            Call::Deliver(group_a()),
        ]
    );
}
