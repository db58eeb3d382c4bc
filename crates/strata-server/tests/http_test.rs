//! HTTP-level tests: exercise the axum router with in-process requests and
//! assert on status codes and JSON bodies.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http_body_util::BodyExt;
use strata_server::http::create_router;
use strata_server::Broker;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn test_router(topics: &[(&str, u32)]) -> (axum::Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let broker = Broker::open(dir.path()).await.unwrap();
    for &(name, partitions) in topics {
        broker.create_topic(name, partitions).await.unwrap();
    }
    (create_router(Arc::new(broker)), dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let (router, _dir) = test_router(&[]).await;

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"status": "healthy"}));
}

#[tokio::test]
async fn metadata_lists_topics() {
    let (router, _dir) = test_router(&[("orders", 3), ("payments", 2)]).await;

    let response = router
        .oneshot(Request::get("/metadata").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"topics": [
            {"name": "orders", "partitions": 3},
            {"name": "payments", "partitions": 2},
        ]})
    );
}

#[tokio::test]
async fn publish_then_fetch_roundtrip() {
    let (router, _dir) = test_router(&[("t", 1)]).await;

    let response = router
        .clone()
        .oneshot(post_json(
            "/topics/events?topic=t",
            serde_json::json!({"key": "a", "payload": {"x": 1}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let published = body_json(response).await;
    assert_eq!(published, serde_json::json!({"partition": 0, "offset": 0}));

    let response = router
        .oneshot(
            Request::get("/messages?topic=t&partition=0&offset=0&maxBytes=65536")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(response).await;
    assert_eq!(fetched["topic"], "t");
    assert_eq!(fetched["partition"], 0);
    let messages = fetched["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["offset"], 0);
    assert_eq!(messages[0]["key"], "a");

    let payload = BASE64
        .decode(messages[0]["payload"].as_str().unwrap())
        .unwrap();
    let decoded: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(decoded, serde_json::json!({"x": 1}));
}

#[tokio::test]
async fn publish_to_unknown_topic_is_404() {
    let (router, dir) = test_router(&[]).await;

    let response = router
        .oneshot(post_json(
            "/topics/events?topic=nope",
            serde_json::json!({"key": "", "payload": {}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
    assert!(!dir.path().join("nope").exists());
}

#[tokio::test]
async fn publish_without_topic_param_is_400() {
    let (router, _dir) = test_router(&[]).await;

    let response = router
        .oneshot(post_json(
            "/topics/events",
            serde_json::json!({"key": "", "payload": {}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetch_unknown_partition_is_404() {
    let (router, _dir) = test_router(&[("t", 1)]).await;

    let response = router
        .oneshot(
            Request::get("/messages?topic=t&partition=5&offset=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fetch_with_bad_partition_number_is_400() {
    let (router, _dir) = test_router(&[("t", 1)]).await;

    let response = router
        .oneshot(
            Request::get("/messages?topic=t&partition=abc&offset=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn commit_acknowledges() {
    let (router, _dir) = test_router(&[("t", 1)]).await;

    let response = router
        .oneshot(post_json(
            "/consumer-groups/offsets/commit?group=g1",
            serde_json::json!({"topic": "t", "partition": 0, "offset": 7}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"status": "committed"})
    );
}
