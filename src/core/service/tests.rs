//! Service client tests against a throwaway local HTTP responder.

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{Endpoint, ServiceError};
use crate::core::test_support::{client_for, request_json, serve_once};

const ASK: Endpoint = Endpoint::post("/ollama/ask");

#[test]
fn url_joins_base_and_path() {
    let client = client_for("http://10.0.0.1:9090/");
    assert_eq!(client.url(&ASK), "http://10.0.0.1:9090/ollama/ask");
    let client = client_for("http://host/api");
    assert_eq!(
        client.url(&Endpoint::post("translate")),
        "http://host/api/translate"
    );
}

#[tokio::test]
async fn call_posts_json_and_decodes_response() {
    let (base, server) = serve_once(200, r#"{"response":{"message":{"content":"hi"}}}"#).await;
    let client = client_for(&base);
    let value = client
        .call(&ASK, &json!({"prompt": "hello"}), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(value["response"]["message"]["content"], "hi");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /ollama/ask HTTP/1.1"));
    assert!(request.to_lowercase().contains("content-type: application/json"));
    assert_eq!(request_json(&request), json!({"prompt": "hello"}));
}

#[tokio::test]
async fn non_success_status_is_reported_with_detail() {
    let (base, server) = serve_once(500, r#"{"error":{"message":"model crashed"}}"#).await;
    let client = client_for(&base);
    let err = client
        .call(&ASK, &json!({"prompt": "x"}), &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        ServiceError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("expected Status, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let (base, server) = serve_once(200, "not json").await;
    let client = client_for(&base);
    let err = client
        .call(&ASK, &json!({"prompt": "x"}), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Decode { route: "/ollama/ask", .. }));
    server.await.unwrap();
}

#[tokio::test]
async fn cancelled_token_short_circuits() {
    let client = client_for("http://127.0.0.1:9");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client
        .call(&ASK, &json!({"prompt": "x"}), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Cancelled));
}

#[tokio::test]
async fn check_connection_online_and_offline() {
    let (base, server) = serve_once(200, "{}").await;
    let client = client_for(&base);
    assert!(client
        .check_connection(&ASK, &CancellationToken::new())
        .await
        .is_ok());
    let request = server.await.unwrap();
    assert!(request.contains("test connection"));

    let (base, server) = serve_once(404, "Not Found").await;
    let client = client_for(&base);
    let err = client
        .check_connection(&ASK, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Status { status: 404, .. }));
    server.await.unwrap();
}
