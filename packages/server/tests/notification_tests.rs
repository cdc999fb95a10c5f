//! Integration tests for the donor notification fan-out: token dedup,
//! empty-set short-circuit, and best-effort failure semantics.

use std::sync::Arc;

use server_core::common::{BloodType, Location};
use server_core::domains::emergency::actions::notify_nearby_donors;
use server_core::kernel::test_dependencies::{
    test_deps, MockBloodStore, MockPlaceLookup, MockPushDelivery,
};

fn center() -> Location {
    Location::new(10.0, 106.0).unwrap()
}

#[tokio::test]
async fn duplicate_tokens_collapse_before_dispatch() {
    // Same device stored twice across donor records (reinstallation)
    let store = Arc::new(
        MockBloodStore::new()
            .with_donor("t1", 10.01, 106.01)
            .with_donor("t2", 10.02, 106.02)
            .with_donor("t1", 10.03, 106.03),
    );
    let push = Arc::new(MockPushDelivery::new());
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push.clone());

    let summary = notify_nearby_donors(&deps, center(), BloodType::ONeg, 50.0).await;

    let calls = push.dispatch_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec!["t1".to_string(), "t2".to_string()]);
    assert_eq!(summary.duplicates_removed, 1);
    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.failure_count, 0);
}

#[tokio::test]
async fn zero_eligible_donors_skips_dispatch_entirely() {
    let store = Arc::new(MockBloodStore::new());
    let push = Arc::new(MockPushDelivery::new());
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push.clone());

    let summary = notify_nearby_donors(&deps, center(), BloodType::APos, 50.0).await;

    assert!(!push.was_called());
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 0);
    assert!(summary.outcomes.is_empty());
}

#[tokio::test]
async fn donors_outside_radius_are_not_notified() {
    let store = Arc::new(
        MockBloodStore::new()
            .with_donor("near", 10.05, 106.0)
            .with_donor("far", 11.0, 106.0),
    );
    let push = Arc::new(MockPushDelivery::new());
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push.clone());

    notify_nearby_donors(&deps, center(), BloodType::BNeg, 50.0).await;

    let calls = push.dispatch_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec!["near".to_string()]);
}

#[tokio::test]
async fn unreachable_delivery_backend_yields_zero_result() {
    let store = Arc::new(MockBloodStore::new().with_donor("t1", 10.01, 106.01));
    let push = Arc::new(MockPushDelivery::new().failing());
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push.clone());

    let summary = notify_nearby_donors(&deps, center(), BloodType::ONeg, 50.0).await;

    // Dispatch was attempted but its failure stays non-fatal
    assert!(push.was_called());
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 0);
    assert!(summary.outcomes.is_empty());
}

#[tokio::test]
async fn donor_lookup_failure_yields_zero_result() {
    let store = Arc::new(MockBloodStore::new().failing_donor_reads());
    let push = Arc::new(MockPushDelivery::new());
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push.clone());

    let summary = notify_nearby_donors(&deps, center(), BloodType::ONeg, 50.0).await;

    assert!(!push.was_called());
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 0);
}

#[tokio::test]
async fn partial_failures_appear_in_per_token_breakdown() {
    let store = Arc::new(
        MockBloodStore::new()
            .with_donor("good", 10.01, 106.01)
            .with_donor("stale", 10.02, 106.02),
    );
    let push = Arc::new(MockPushDelivery::new().with_failing_token("stale"));
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push);

    let summary = notify_nearby_donors(&deps, center(), BloodType::AbPos, 50.0).await;

    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.outcomes.len(), 2);
    let stale = summary
        .outcomes
        .iter()
        .find(|o| o.token == "stale")
        .unwrap();
    assert!(!stale.delivered);
    assert!(stale.error.is_some());
}

#[tokio::test]
async fn payload_names_the_requested_blood_type() {
    let store = Arc::new(MockBloodStore::new().with_donor("t1", 10.01, 106.01));
    let push = Arc::new(MockPushDelivery::new());
    let deps = test_deps(store, Arc::new(MockPlaceLookup::new()), push.clone());

    notify_nearby_donors(&deps, center(), BloodType::AbNeg, 50.0).await;

    let payloads = push.sent_payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].body.contains("AB-"));
    assert_eq!(payloads[0].data["blood_type"], "AB-");
}
