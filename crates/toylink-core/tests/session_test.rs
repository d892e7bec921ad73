// Device session tests against a wiremock LAN relay.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use toylink_core::{
    ConnectionInfo, ConnectionManager, CoreError, LanClient, Preset, ToyRecord, ToyStatus,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn relay_info(toy_ids: &[&str]) -> ConnectionInfo {
    let toys: HashMap<String, ToyRecord> = toy_ids
        .iter()
        .map(|id| {
            (
                (*id).to_owned(),
                ToyRecord {
                    id: (*id).to_owned(),
                    name: format!("Toy {id}"),
                    nick_name: Some(format!("My {id}")),
                    status: ToyStatus::Online,
                },
            )
        })
        .collect();
    ConnectionInfo {
        user_id: "user123".into(),
        app_version: "4.0.1".into(),
        toys,
        domain: "192-168-1-7.lovense.club".into(),
        secure_port: "30010".into(),
        insecure_port: "30110".into(),
        wss_port: "30011".into(),
        ws_port: "30111".into(),
        user_token: "ut".into(),
        app_type: "remote".into(),
        platform: "android".into(),
        app_version_code: "101".into(),
    }
}

/// Manager whose sessions talk to the mock relay instead of the
/// `https://{domain}:{port}` endpoint from the callback payload.
async fn connected_manager(server: &MockServer, toy_ids: &[&str]) -> ConnectionManager {
    let base = Url::parse(&server.uri()).expect("mock server URI");
    let lan = Arc::new(LanClient::from_url(base, reqwest::Client::new()));
    let mut manager = ConnectionManager::new(TransportConfig::default());
    manager.handle_callback_with(relay_info(toy_ids), lan);
    manager
}

fn ok_body() -> serde_json::Value {
    json!({ "code": 200, "type": "OK" })
}

// ── Command shaping ─────────────────────────────────────────────────

#[tokio::test]
async fn vibrate_scales_to_twenty_point_scale() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/command"))
        .and(body_json(json!({
            "command": "Function",
            "action": "Vibrate:10",
            "timeSec": 0,
            "stopPrevious": 1,
            "toy": "a",
            "apiVer": 1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    let session = manager.get_session("a").expect("session");

    session.vibrate(0.5).await.expect("vibrate");
    assert_eq!(session.commands_sent(), 1);
}

#[tokio::test]
async fn pump_scales_to_three_point_scale() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/command"))
        .and(body_json(json!({
            "command": "Function",
            "action": "Pump:3",
            "timeSec": 0,
            "stopPrevious": 1,
            "toy": "a",
            "apiVer": 1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    manager
        .get_session("a")
        .expect("session")
        .pump(1.0)
        .await
        .expect("pump");
}

#[tokio::test]
async fn preset_sends_lowercase_name_and_duration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/command"))
        .and(body_json(json!({
            "command": "Preset",
            "name": "pulse",
            "timeSec": 5,
            "toy": "a",
            "apiVer": 1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    manager
        .get_session("a")
        .expect("session")
        .preset(Preset::Pulse, 5)
        .await
        .expect("preset");
}

#[tokio::test]
async fn stop_sends_bare_stop_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/command"))
        .and(body_json(json!({
            "command": "Function",
            "action": "Stop",
            "toy": "a",
            "apiVer": 1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    manager
        .get_session("a")
        .expect("session")
        .stop()
        .await
        .expect("stop");
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn out_of_range_intensity_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(0)
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    let session = manager.get_session("a").expect("session");

    assert!(matches!(
        session.vibrate(1.5).await,
        Err(CoreError::ValidationFailed { .. })
    ));
    assert!(matches!(
        session.rotate(-0.2).await,
        Err(CoreError::ValidationFailed { .. })
    ));
    assert_eq!(session.commands_sent(), 0);
}

#[tokio::test]
async fn zero_duration_preset_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(0)
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    assert!(matches!(
        manager
            .get_session("a")
            .expect("session")
            .preset(Preset::Wave, 0)
            .await,
        Err(CoreError::ValidationFailed { .. })
    ));
}

// ── Error surface ───────────────────────────────────────────────────

#[tokio::test]
async fn vendor_error_surfaces_as_command_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 404,
            "message": "Invalid toy ID"
        })))
        .mount(&server)
        .await;

    let manager = connected_manager(&server, &["a"]).await;
    let session = manager.get_session("a").expect("session");

    match session.vibrate(0.5).await {
        Err(CoreError::CommandFailed { ref message }) => assert_eq!(message, "Invalid toy ID"),
        other => panic!("expected CommandFailed, got: {other:?}"),
    }

    // The failure mutates nothing: the session set is intact and the
    // session still works once the relay recovers.
    assert!(manager.get_session("a").is_some());
}

// ── Session identity ────────────────────────────────────────────────

#[tokio::test]
async fn session_exposes_identity_from_snapshot() {
    let server = MockServer::start().await;
    let manager = connected_manager(&server, &["a"]).await;
    let session = manager.get_session("a").expect("session");

    assert_eq!(session.id(), "a");
    assert_eq!(session.display_name(), "My a");
    assert!(session.is_online());
    assert_eq!(session.connection().platform, "android");
}

// ── Teardown semantics ──────────────────────────────────────────────

#[tokio::test]
async fn held_session_survives_manager_disconnect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let mut manager = connected_manager(&server, &["a"]).await;
    let session = manager.get_session("a").expect("session");

    manager.disconnect();

    // No cancellation is threaded through: a caller still holding the
    // Arc can complete its request against the old relay endpoint.
    session.stop().await.expect("orphaned send completes");
}
