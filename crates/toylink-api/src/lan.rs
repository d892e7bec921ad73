// LAN relay HTTP client
//
// The vendor's mobile app runs a local HTTPS server ("LAN relay") that
// accepts one command per request. This client wraps `reqwest::Client`
// with the relay's URL construction and result-code checking. The vendor
// API is stateless per request: no session, no ordering guarantees.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{CommandResponse, ConnectionInfo, ToyCommand};

/// Protocol version for direct LAN commands.
const LAN_API_VER: u8 = 1;

/// Full request body for `/command`: the caller's payload plus the
/// addressing fields the relay requires on every request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandEnvelope<'a> {
    #[serde(flatten)]
    command: &'a ToyCommand,
    toy: &'a str,
    api_ver: u8,
}

/// HTTP client for one LAN relay endpoint.
///
/// Built from a [`ConnectionInfo`] and shared by every device session
/// derived from that callback. Requests carry a fixed timeout; there is
/// no retry and no queueing -- two concurrent commands to the same toy
/// race at the relay, and the relay's last command wins.
pub struct LanClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl LanClient {
    /// Create a client for the relay endpoint named in `info`.
    pub fn new(info: &ConnectionInfo, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = info.relay_url().map_err(Error::InvalidUrl)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` and explicit
    /// base URL. Used by tests and by hosts that resolve the relay
    /// address themselves.
    pub fn from_url(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: TransportConfig::default().timeout_secs(),
        }
    }

    /// The relay base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one command to one toy: `POST {base}/command`.
    ///
    /// Exactly one request per call. Fails on transport errors, timeout,
    /// a non-2xx status, or a vendor result code other than 200. A failed
    /// send leaves no state behind anywhere in this crate.
    pub async fn send(&self, toy_id: &str, command: &ToyCommand) -> Result<CommandResponse, Error> {
        let url = self.base_url.join("command").map_err(Error::InvalidUrl)?;
        debug!(%url, toy_id, command = command.command, "POST command");

        let envelope = CommandEnvelope {
            command,
            toy: toy_id,
            api_ver: LAN_API_VER,
        };

        let resp = self
            .http
            .post(url)
            .json(&envelope)
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
                    .clone()
                    .unwrap_or_else(|| format!("code={}", parsed.code)),
                code: parsed.code,
            });
        }

        Ok(parsed)
    }
}
