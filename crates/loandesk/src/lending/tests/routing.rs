use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;
use tower::util::ServiceExt;

use super::common::*;
use crate::lending::router::lending_router;
use crate::lending::store::DecisionPolicy;

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn router() -> axum::Router {
    let today = Utc::now().date_naive();
    let provider = MemoryProvider::with_fixtures(vec![
        approve_fixture("cust-001", today),
        reject_fixture("cust-002", today),
    ]);
    let (service, _store) = build_service(provider, DecisionPolicy::AppendOnly);
    lending_router(Arc::new(service))
}

#[tokio::test]
async fn evaluate_endpoint_returns_the_decision_record() {
    let app = router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/customers/cust-001/evaluate")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "APPROVE");
    assert_eq!(body["customer_id"], "cust-001");
    assert!(body["reason"].as_str().expect("reason").contains("all 11"));
}

#[tokio::test]
async fn evaluate_endpoint_maps_unknown_customers_to_404() {
    let app = router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/customers/ghost/evaluate")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("error").contains("ghost"));
}

#[tokio::test]
async fn decisions_endpoint_lists_persisted_records() {
    let app = router();

    let empty = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/decisions")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request handled");
    assert_eq!(empty.status(), StatusCode::OK);
    let body = read_json_body(empty).await;
    assert_eq!(body["decisions"], Value::Array(Vec::new()));

    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/customers/cust-002/evaluate")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request handled");

    let listed = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/decisions?customer_id=cust-002&limit=10")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request handled");
    assert_eq!(listed.status(), StatusCode::OK);
    let body = read_json_body(listed).await;
    let decisions = body["decisions"].as_array().expect("decision list");
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0]["decision"], "REJECT");
}

#[tokio::test]
async fn summary_endpoint_returns_masked_cards_and_signals() {
    let app = router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/customers/cust-001")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["credit_cards"][0]["masked_number"], "****4444");
    assert_eq!(body["signals"]["active_loans_count"], 1);
}
