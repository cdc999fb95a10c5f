//! Route-level tests against the axum app with mock collaborators.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use server_core::kernel::test_dependencies::{
    test_deps, MockBloodStore, MockPlaceLookup, MockPushDelivery,
};
use server_core::server::{build_app, AppState};

fn app_with(store: MockBloodStore) -> axum::Router {
    let deps = test_deps(
        Arc::new(store),
        Arc::new(MockPlaceLookup::new()),
        Arc::new(MockPushDelivery::new()),
    );
    let state = AppState {
        db_pool: None,
        deps: Arc::new(deps),
    };
    build_app(state, vec!["*".to_string()])
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn match_requires_requester_location() {
    let app = app_with(MockBloodStore::new());

    let response = app
        .oneshot(post_json(
            "/api/emergency/match",
            serde_json::json!({ "blood_type": "O-" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("requester_location"));
}

#[tokio::test]
async fn match_rejects_unknown_blood_type() {
    let app = app_with(MockBloodStore::new());

    let response = app
        .oneshot(post_json(
            "/api/emergency/match",
            serde_json::json!({
                "requester_location": { "latitude": 10.0, "longitude": 106.0 },
                "blood_type": "Z+"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Z+"));
}

#[tokio::test]
async fn match_rejects_out_of_range_latitude() {
    let app = app_with(MockBloodStore::new());

    let response = app
        .oneshot(post_json(
            "/api/emergency/match",
            serde_json::json!({
                "requester_location": { "latitude": 91.0, "longitude": 0.0 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn match_returns_ranked_results() {
    let bank = Uuid::new_v4();
    let app = app_with(
        MockBloodStore::new()
            .with_bank(bank, "City Blood Bank", 10.01, 106.01)
            .with_inventory(bank, server_core::common::BloodType::ONeg, 5),
    );

    let response = app
        .oneshot(post_json(
            "/api/emergency/match",
            serde_json::json!({
                "requester_location": { "latitude": 10.0, "longitude": 106.0 },
                "blood_type": "O-"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["expanded"], false);
    assert_eq!(body["total_matches"], 1);
    assert_eq!(body["results"][0]["name"], "City Blood Bank");
    assert_eq!(body["results"][0]["has_exact_match"], true);
}

#[tokio::test]
async fn match_truncates_to_top_five() {
    let mut store = MockBloodStore::new();
    for i in 0..8 {
        store = store.with_bank(
            Uuid::new_v4(),
            &format!("Bank {}", i),
            10.01 + i as f64 * 0.01,
            106.0,
        );
    }
    let app = app_with(store);

    let response = app
        .oneshot(post_json(
            "/api/emergency/match",
            serde_json::json!({
                "requester_location": { "latitude": 10.0, "longitude": 106.0 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total_matches"], 8);
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn notify_requires_blood_type() {
    let app = app_with(MockBloodStore::new());

    let response = app
        .oneshot(post_json(
            "/api/emergency/notify",
            serde_json::json!({
                "center": { "latitude": 10.0, "longitude": 106.0 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("blood_type"));
}

#[tokio::test]
async fn notify_reports_dispatch_summary() {
    let app = app_with(
        MockBloodStore::new()
            .with_donor("t1", 10.01, 106.01)
            .with_donor("t1", 10.02, 106.02),
    );

    let response = app
        .oneshot(post_json(
            "/api/emergency/notify",
            serde_json::json!({
                "center": { "latitude": 10.0, "longitude": 106.0 },
                "blood_type": "B+",
                "max_distance_km": 25.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["failure_count"], 0);
    assert_eq!(body["duplicates_removed"], 1);
}

#[tokio::test]
async fn notify_rejects_non_positive_radius() {
    let app = app_with(MockBloodStore::new());

    let response = app
        .oneshot(post_json(
            "/api/emergency/notify",
            serde_json::json!({
                "center": { "latitude": 10.0, "longitude": 106.0 },
                "blood_type": "A+",
                "max_distance_km": -5.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_without_database_reports_not_configured() {
    let app = app_with(MockBloodStore::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "not_configured");
}
