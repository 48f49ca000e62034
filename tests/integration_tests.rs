//! End-to-end tests for the Client Echo server.
//!
//! Each test starts the real server on an ephemeral port and talks to it
//! over HTTP with `reqwest`, exactly as an external client would.
//!
//! Run with: `cargo test --test integration_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use client_echo::{AppState, Config, build_router};

/// Test fixture that owns a running server and an HTTP client.
struct TestFixture {
    base_url: String,
    client: Client,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_config(Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Config::default()
        })
        .await
    }

    async fn with_config(config: Config) -> Self {
        // Binding before spawning means the port accepts connections immediately
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to ephemeral port");
        let addr: SocketAddr = listener.local_addr().expect("Failed to get local address");

        let app = build_router(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_client(
        &self,
        path_and_query: &str,
        credentials: Option<(&str, &str)>,
        body: &Value,
    ) -> (StatusCode, Value) {
        let mut request = self.client.post(self.url(path_and_query)).json(body);
        if let Some((user, pass)) = credentials {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await.expect("Failed to send request");
        let status = response.status();
        let body = response.json().await.expect("Response was not JSON");
        (status, body)
    }
}

const VALID: Option<(&str, &str)> = Some(("user", "password"));
const RANGE: &str = "/client/client-42?start_date=01-03-2024&end_date=31-03-2024";

#[tokio::test]
async fn test_full_round_trip_integer_amount() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_client(RANGE, VALID, &json!({"date": "15-03-2024", "amount": 100}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "client_id": "client-42",
            "received_date": "15-03-2024",
            "amount": 100,
            "query_start_date": "01-03-2024",
            "query_end_date": "31-03-2024"
        })
    );
}

#[tokio::test]
async fn test_full_round_trip_float_amount() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_client(RANGE, VALID, &json!({"date": "29-02-2024", "amount": 99.95}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], json!(99.95));
    assert_eq!(body["received_date"], "29-02-2024");
}

#[tokio::test]
async fn test_request_id_round_trip() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .post(fixture.url(RANGE))
        .basic_auth("user", Some("password"))
        .header("x-request-id", "e2e-correlation")
        .json(&json!({"date": "15-03-2024", "amount": 1}))
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "e2e-correlation"
    );
}

#[tokio::test]
async fn test_unauthorized_without_credentials() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_client(RANGE, None, &json!({"date": "15-03-2024", "amount": 1}))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn test_unauthorized_with_wrong_password() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_client(
            "/client/x",
            Some(("user", "letmein")),
            &json!({"amount": "oops"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn test_guard_order_query_before_body() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post_client(
            "/client/x?start_date=01-03-2024",
            VALID,
            &json!({"date": "bad", "amount": "bad"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"error": "Missing query parameters"}));
}

#[tokio::test]
async fn test_body_errors_in_order() {
    let fixture = TestFixture::new().await;

    let cases = [
        (
            json!({"date": "2024-03-15", "amount": 1}),
            "Invalid 'date' format",
        ),
        (
            json!({"date": "15-03-2024", "amount": "100"}),
            "Invalid 'amount' type",
        ),
        (
            json!({"date": "15-03-2024", "amount": false}),
            "Invalid 'amount' type",
        ),
        (json!(["15-03-2024", 1]), "Invalid JSON payload"),
    ];

    for (payload, expected) in cases {
        let (status, body) = fixture.post_client(RANGE, VALID, &payload).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "payload: {payload}");
        assert_eq!(body, json!({"error": expected}), "payload: {payload}");
    }
}

#[tokio::test]
async fn test_malformed_json_text() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .post(fixture.url(RANGE))
        .basic_auth("user", Some("password"))
        .header("content-type", "application/json")
        .body("{\"date\": \"15-03-2024\", \"amount\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid JSON payload"}));
}

#[tokio::test]
async fn test_requests_are_independent() {
    let fixture = TestFixture::new().await;

    // A rejected request must not influence the next one
    let (status, _) = fixture
        .post_client(RANGE, Some(("user", "nope")), &json!({}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let payload = json!({"date": "15-03-2024", "amount": 7});
    let first = fixture.post_client(RANGE, VALID, &payload).await;
    let second = fixture.post_client(RANGE, VALID, &payload).await;

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}
