// Integration tests for `CloudClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use toylink_api::{CloudClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CloudClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).expect("mock server URI");
    let client = CloudClient::from_url(base, reqwest::Client::new());
    (server, client)
}

// ── QR pairing ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_qr_code_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/lan/getQrCode"))
        .and(body_partial_json(json!({
            "token": "dev-token",
            "uid": "user123",
            "uname": "User",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "code": 200,
            "message": "https://img/qr.png"
        })))
        .mount(&server)
        .await;

    let url = client
        .get_qr_code("dev-token", "user123", "User", "utoken-abc")
        .await
        .expect("QR request");

    assert_eq!(url, "https://img/qr.png");
}

#[tokio::test]
async fn test_get_qr_code_vendor_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/lan/getQrCode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": false,
            "code": 401,
            "message": "bad token"
        })))
        .mount(&server)
        .await;

    let result = client.get_qr_code("nope", "user123", "User", "ut").await;

    match result {
        Err(Error::Pairing { ref message, code }) => {
            assert_eq!(message, "bad token");
            assert_eq!(code, 401);
        }
        other => panic!("expected Pairing error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_qr_code_http_500() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.get_qr_code("tok", "user123", "User", "ut").await;

    match result {
        Err(Error::Http { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_qr_code_garbage_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.get_qr_code("tok", "user123", "User", "ut").await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Server relay ────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_command_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/lan/v2/command"))
        .and(body_partial_json(json!({
            "token": "dev-token",
            "uid": "u1,u2",
            "command": "Function",
            "action": "Vibrate:10",
            "timeSec": 20,
            "apiVer": 2,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200 })))
        .mount(&server)
        .await;

    client
        .send_server_command(
            "dev-token",
            &["u1".into(), "u2".into()],
            "Function",
            Some("Vibrate:10"),
            Some(20),
        )
        .await
        .expect("server command");
}

#[tokio::test]
async fn test_server_command_vendor_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/lan/v2/command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 404,
            "message": "no toys online"
        })))
        .mount(&server)
        .await;

    let result = client
        .send_server_command("dev-token", &["u1".into()], "Function", None, None)
        .await;

    match result {
        Err(Error::Command { ref message, code }) => {
            assert_eq!(message, "no toys online");
            assert_eq!(code, 404);
        }
        other => panic!("expected Command error, got: {other:?}"),
    }
}
