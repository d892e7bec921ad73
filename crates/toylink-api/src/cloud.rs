// Cloud API HTTP client
//
// Two endpoints live on the vendor cloud: QR pairing (the entry point of
// the pairing flow) and the v2 server relay, which forwards commands
// through the vendor when no LAN route to the phone exists.

use serde::Serialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{CommandResponse, QrCodeResponse};

/// Production cloud endpoint.
pub const DEFAULT_CLOUD_URL: &str = "https://api.lovense.com";

/// Protocol version for server-relayed commands.
const SERVER_API_VER: u8 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerCommandRequest<'a> {
    token: &'a str,
    /// Comma-joined user ids -- the relay fans the command out.
    uid: String,
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_sec: Option<u64>,
    api_ver: u8,
}

/// HTTP client for the vendor cloud.
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl CloudClient {
    /// Create a client against the production cloud.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_CLOUD_URL).map_err(Error::InvalidUrl)?;
        Self::with_base_url(base_url, transport)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn from_url(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: TransportConfig::default().timeout_secs(),
        }
    }

    /// The cloud base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request a pairing QR code: `POST /api/lan/getQrCode`.
    ///
    /// `user_token` is an opaque correlation value the vendor echoes back
    /// through the callback; the caller derives it (see toylink-core).
    /// Returns the QR image URL on success. A vendor failure result maps
    /// to [`Error::Pairing`] carrying the vendor's message.
    pub async fn get_qr_code(
        &self,
        token: &str,
        user_id: &str,
        user_name: &str,
        user_token: &str,
    ) -> Result<String, Error> {
        let url = self
            .base_url
            .join("api/lan/getQrCode")
            .map_err(Error::InvalidUrl)?;
        debug!(%url, user_id, "requesting pairing QR code");

        let body = json!({
            "token": token,
            "uid": user_id,
            "uname": user_name,
            "utoken": user_token,
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, self.timeout_secs))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: QrCodeResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if parsed.result && parsed.code == 200 {
            debug!("QR code issued");
            Ok(parsed.message)
        } else {
            Err(Error::Pairing {
                message: if parsed.message.is_empty() {
                    format!("code={}", parsed.code)
                } else {
                    parsed.message
                },
                code: parsed.code,
            })
        }
    }

    /// Send a command through the vendor's server relay:
    /// `POST /api/lan/v2/command`.
    ///
    /// Alternate path for when no LAN route exists. The command is fanned
    /// out to every listed user's connected toys.
    pub async fn send_server_command(
        &self,
        token: &str,
        user_ids: &[String],
        command: &str,
        action: Option<&str>,
        time_sec: Option<u64>,
    ) -> Result<(), Error> {
        let url = self
            .base_url
            .join("api/lan/v2/command")
            .map_err(Error::InvalidUrl)?;
        debug!(%url, users = user_ids.len(), command, "POST server-relay command");

        let body = ServerCommandRequest {
            token,
            uid: user_ids.join(","),
            command,
            action,
            time_sec,
            api_ver: SERVER_API_VER,
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, self.timeout_secs))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: CommandResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if parsed.code != 200 {
            return Err(Error::Command {
                message: parsed
                    .message
                    .unwrap_or_else(|| format!("code={}", parsed.code)),
                code: parsed.code,
            });
        }

        Ok(())
    }
}
