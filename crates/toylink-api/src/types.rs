// ── Wire types for both Lovense API surfaces ──
//
// Field names follow Rust conventions with serde renames to the vendor's
// camelCase wire shape. Everything received from the vendor is an
// immutable snapshot -- a later callback replaces it wholesale.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

// ── Toys ────────────────────────────────────────────────────────────

/// Online/offline flag, `0|1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ToyStatus {
    Offline,
    Online,
}

impl From<u8> for ToyStatus {
    fn from(value: u8) -> Self {
        if value == 1 { Self::Online } else { Self::Offline }
    }
}

impl From<ToyStatus> for u8 {
    fn from(value: ToyStatus) -> Self {
        match value {
            ToyStatus::Offline => 0,
            ToyStatus::Online => 1,
        }
    }
}

impl ToyStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// One physical device as reported by the vendor's mobile app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    pub status: ToyStatus,
}

impl ToyRecord {
    /// User-facing name: nickname when set, device name otherwise.
    pub fn display_name(&self) -> &str {
        self.nick_name.as_deref().unwrap_or(&self.name)
    }
}

// ── Connection info ─────────────────────────────────────────────────

/// Payload the vendor's mobile app POSTs to the host's callback endpoint
/// after a successful QR scan.
///
/// Identifies the LAN relay endpoint (`domain` + `secure_port`) and the
/// set of connected toys. Shared read-only by every session derived from
/// it; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    #[serde(rename = "uid")]
    pub user_id: String,
    #[serde(rename = "appVersion")]
    pub app_version: String,
    pub toys: HashMap<String, ToyRecord>,
    pub domain: String,
    #[serde(rename = "httpsPort")]
    pub secure_port: String,
    #[serde(rename = "httpPort")]
    pub insecure_port: String,
    #[serde(rename = "wssPort")]
    pub wss_port: String,
    #[serde(rename = "wsPort")]
    pub ws_port: String,
    #[serde(rename = "utoken")]
    pub user_token: String,
    #[serde(rename = "appType")]
    pub app_type: String,
    pub platform: String,
    #[serde(rename = "version")]
    pub app_version_code: String,
}

impl ConnectionInfo {
    /// Base URL of the LAN relay: `https://{domain}:{secure_port}/`.
    pub fn relay_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("https://{}:{}/", self.domain, self.secure_port))
    }
}

// ── Commands ────────────────────────────────────────────────────────

/// Motion function names used inside `action` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Vibrate,
    Rotate,
    Pump,
    Stop,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vibrate => "Vibrate",
            Self::Rotate => "Rotate",
            Self::Pump => "Pump",
            Self::Stop => "Stop",
        }
    }

    /// Compose an `action` string with a discrete level, e.g. `Vibrate:12`.
    pub fn with_level(self, level: u8) -> String {
        format!("{}:{level}", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in motion patterns the device runs on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Pulse,
    Wave,
    Fireworks,
    Earthquake,
}

impl Preset {
    /// Wire name -- the relay expects lowercase.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pulse => "pulse",
            Self::Wave => "wave",
            Self::Fireworks => "fireworks",
            Self::Earthquake => "earthquake",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown preset '{0}' (expected pulse, wave, fireworks, or earthquake)")]
pub struct UnknownPreset(String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pulse" => Ok(Self::Pulse),
            "wave" => Ok(Self::Wave),
            "fireworks" => Ok(Self::Fireworks),
            "earthquake" => Ok(Self::Earthquake),
            _ => Err(UnknownPreset(s.to_owned())),
        }
    }
}

/// A single command payload for the LAN relay's `/command` endpoint.
///
/// The `toy` and `apiVer` fields are appended by
/// [`LanClient::send`](crate::lan::LanClient::send) -- callers only
/// describe the motion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyCommand {
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_sec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_running_sec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_pause_sec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_previous: Option<u8>,
}

impl ToyCommand {
    fn base(command: &'static str) -> Self {
        Self {
            command,
            action: None,
            name: None,
            rule: None,
            time_sec: None,
            loop_running_sec: None,
            loop_pause_sec: None,
            stop_previous: None,
        }
    }

    /// A `Function` command that starts a motion and keeps it running
    /// (`timeSec=0` means indefinite). `stopPrevious=1` cancels whatever
    /// pattern is in flight on the device first -- documented vendor
    /// semantics, which also makes re-sending safe.
    pub fn motion(action: String) -> Self {
        Self {
            action: Some(action),
            time_sec: Some(0),
            stop_previous: Some(1),
            ..Self::base("Function")
        }
    }

    /// A `Function` command cancelling motion unconditionally.
    pub fn stop() -> Self {
        Self {
            action: Some(Action::Stop.as_str().to_owned()),
            ..Self::base("Function")
        }
    }

    /// A `Preset` command: run the named built-in pattern for
    /// `time_sec` seconds, then stop automatically.
    pub fn preset(preset: Preset, time_sec: u64) -> Self {
        Self {
            name: Some(preset.as_str().to_owned()),
            time_sec: Some(time_sec),
            ..Self::base("Preset")
        }
    }

    /// A raw `Pattern` command. The rule grammar (version tag, per-axis
    /// intensity sequence, millisecond interval) is the vendor's contract;
    /// it passes through uninterpreted.
    pub fn pattern(rule: String, time_sec: u64) -> Self {
        Self {
            rule: Some(rule),
            time_sec: Some(time_sec),
            ..Self::base("Pattern")
        }
    }
}

// ── Responses ───────────────────────────────────────────────────────

/// Response body from the LAN relay and the server-relay endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandResponse {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Response body from the cloud pairing endpoint. On success `message`
/// holds the QR image URL; on failure it holds an error string.
#[derive(Debug, Clone, Deserialize)]
pub struct QrCodeResponse {
    pub result: bool,
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toy_status_wire_mapping() {
        let toy: ToyRecord =
            serde_json::from_str(r#"{"id":"t1","name":"Lush","status":1}"#).expect("parse");
        assert!(toy.status.is_online());
        assert_eq!(toy.display_name(), "Lush");

        let toy: ToyRecord =
            serde_json::from_str(r#"{"id":"t1","name":"Lush","nickName":"Mine","status":0}"#)
                .expect("parse");
        assert!(!toy.status.is_online());
        assert_eq!(toy.display_name(), "Mine");
    }

    #[test]
    fn connection_info_round_trips_wire_names() {
        let json = r#"{
            "uid": "u1",
            "appVersion": "4.0.1",
            "toys": {"t1": {"id": "t1", "name": "Lush", "status": 1}},
            "domain": "192-168-1-7.lovense.club",
            "httpsPort": "30010",
            "httpPort": "30110",
            "wssPort": "30011",
            "wsPort": "30111",
            "utoken": "abc",
            "appType": "remote",
            "platform": "ios",
            "version": "101"
        }"#;
        let info: ConnectionInfo = serde_json::from_str(json).expect("parse");
        assert_eq!(info.user_id, "u1");
        assert_eq!(info.secure_port, "30010");
        assert_eq!(
            info.relay_url().expect("url").as_str(),
            "https://192-168-1-7.lovense.club:30010/"
        );

        let back = serde_json::to_value(&info).expect("serialize");
        assert_eq!(back["httpsPort"], "30010");
        assert_eq!(back["uid"], "u1");
        assert_eq!(back["version"], "101");
    }

    #[test]
    fn motion_command_serializes_vendor_fields() {
        let cmd = ToyCommand::motion(Action::Vibrate.with_level(12));
        let v = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(v["command"], "Function");
        assert_eq!(v["action"], "Vibrate:12");
        assert_eq!(v["timeSec"], 0);
        assert_eq!(v["stopPrevious"], 1);
        assert!(v.get("name").is_none());
        assert!(v.get("rule").is_none());
    }

    #[test]
    fn stop_command_omits_time_and_stop_previous() {
        let v = serde_json::to_value(ToyCommand::stop()).expect("serialize");
        assert_eq!(v["action"], "Stop");
        assert!(v.get("timeSec").is_none());
        assert!(v.get("stopPrevious").is_none());
    }

    #[test]
    fn preset_command_uses_lowercase_name() {
        let v = serde_json::to_value(ToyCommand::preset(Preset::Pulse, 5)).expect("serialize");
        assert_eq!(v["command"], "Preset");
        assert_eq!(v["name"], "pulse");
        assert_eq!(v["timeSec"], 5);
    }

    #[test]
    fn preset_parses_case_insensitively() {
        assert_eq!("PULSE".parse::<Preset>().expect("parse"), Preset::Pulse);
        assert_eq!("wave".parse::<Preset>().expect("parse"), Preset::Wave);
        assert!("spiral".parse::<Preset>().is_err());
    }
}
