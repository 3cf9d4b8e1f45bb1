//! Integration tests for the resilient Snipe-IT transport.
//!
//! Covers rate-limit pauses, 429/5xx retry behavior, client-error
//! passthrough and retry exhaustion.

use async_trait::async_trait;
use mdmsync_snipeit::{ResilientClient, RetryPolicy, Sleeper, SnipeError};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every requested sleep instead of waiting.
#[derive(Debug, Default)]
struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn client(server: &MockServer, rate_limit: u32) -> (ResilientClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = ResilientClient::with_http_client(
        &server.uri(),
        "test-token",
        rate_limit,
        reqwest::Client::new(),
    )
    .with_sleeper(sleeper.clone());
    (client, sleeper)
}

#[tokio::test]
async fn test_sends_bearer_token_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer test-token"))
        .and(query_param("search", "iPad13,1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "rows": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, sleeper) = client(&server, 100);
    let response = client
        .get("/models", &[("search", "iPad13,1".to_string())])
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn test_429_twice_then_success_sleeps_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hardware/byserial/ABC"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hardware/byserial/ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "rows": [] })))
        .mount(&server)
        .await;

    let (client, sleeper) = client(&server, 100);
    let response = client.get("/hardware/byserial/ABC", &[]).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(
        sleeper.sleeps(),
        vec![Duration::from_secs(60), Duration::from_secs(60)]
    );
    // 429 does not reset the local budget.
    assert_eq!(client.requests_in_window(), 3);
}

#[tokio::test]
async fn test_server_errors_exhaust_retries_and_reset_budget() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/hardware/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(10)
        .mount(&server)
        .await;

    let (client, sleeper) = client(&server, 100);
    let err = client
        .patch("/hardware/7", &json!({ "name": "x" }))
        .await
        .unwrap_err();

    match err {
        SnipeError::RetriesExhausted {
            method,
            path,
            attempts,
        } => {
            assert_eq!(method, "PATCH");
            assert_eq!(path, "/hardware/7");
            assert_eq!(attempts, 10);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(sleeper.sleeps().len(), 10);
    // Reset after the last 500.
    assert_eq!(client.requests_in_window(), 0);
}

#[tokio::test]
async fn test_server_error_resets_budget_after_every_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    // A budget of one request: without a reset after each 5xx every later
    // attempt would first wait out the rate window.
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = ResilientClient::with_http_client(
        &server.uri(),
        "t",
        1,
        reqwest::Client::new(),
    )
    .with_policy(RetryPolicy::new(4, Duration::from_secs(1)).with_rate_window(Duration::from_secs(60)))
    .with_sleeper(sleeper.clone());

    let err = client.get("/models", &[]).await.unwrap_err();

    assert!(err.is_exhausted());
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1); 4]);
    assert_eq!(client.requests_in_window(), 0);
}

#[tokio::test]
async fn test_client_error_is_returned_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hardware"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "messages": "invalid" })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, sleeper) = client(&server, 100);
    let response = client.post("/hardware", Some(&json!({}))).await.unwrap();

    assert_eq!(response.status.as_u16(), 422);
    assert!(response.body.contains("invalid"));
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn test_rate_window_pause_when_budget_spent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "rows": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let (client, sleeper) = client(&server, 2);
    for _ in 0..3 {
        client.get("/users", &[]).await.unwrap();
    }

    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(60)]);
    assert_eq!(client.requests_in_window(), 1);
}

#[tokio::test]
async fn test_transport_failure_consumes_attempts() {
    // Bind then release a port so nothing listens on it.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = ResilientClient::with_http_client(
        &format!("http://{addr}"),
        "t",
        100,
        reqwest::Client::new(),
    )
    .with_policy(RetryPolicy::new(3, Duration::from_secs(60)))
    .with_sleeper(sleeper.clone());

    let err = client.delete("/hardware/1").await.unwrap_err();

    assert!(err.is_exhausted());
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(60); 3]);
}
