// ── Pairing flow ──
//
// Drives the sequence: validate developer token -> request QR code ->
// await the out-of-band callback from the vendor's mobile app. Progress
// and errors are observable through a typed settings store so a UI can
// render the latest state without polling.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use toylink_api::{CloudClient, ConnectionInfo};

use crate::error::CoreError;
use crate::manager::ConnectionManager;
use crate::settings::SettingsStore;

/// Salt mixed into the user-verification token. This is a correlation
/// value the vendor echoes back through the callback, not an
/// authentication secret -- do not treat it as a security control.
const VERIFY_SALT: &str = "salt";

/// Where the flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingPhase {
    #[default]
    Idle,
    Initializing,
    AwaitingScan,
    Connected,
    Error,
}

/// Observable pairing state, held in a [`SettingsStore`].
///
/// `qr_code_url` is only meaningful in [`PairingPhase::AwaitingScan`];
/// it is cleared the moment a callback arrives or the flow disconnects.
#[derive(Debug, Clone, Default)]
pub struct PairingSettings {
    pub phase: PairingPhase,
    pub developer_token: Option<String>,
    pub qr_code_url: Option<String>,
    pub last_error: Option<String>,
}

/// The local user identity sent to the pairing endpoint. The vendor uses
/// it to label the connection inside its mobile app.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
}

/// State machine from token validation to an established connection.
///
/// `Idle -> Initializing -> AwaitingScan -> Connected`, with `Error`
/// reachable from `Initializing` and `AwaitingScan`; `disconnect` returns
/// to `Idle` from anywhere. No QR expiry is tracked here -- a stale code
/// simply fails on the vendor side.
pub struct PairingFlow {
    cloud: CloudClient,
    manager: ConnectionManager,
    identity: UserIdentity,
    settings: SettingsStore<PairingSettings>,
}

impl PairingFlow {
    pub fn new(cloud: CloudClient, manager: ConnectionManager, identity: UserIdentity) -> Self {
        Self {
            cloud,
            manager,
            identity,
            settings: SettingsStore::default(),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// The typed settings store a UI reads and subscribes to.
    pub fn settings(&self) -> &SettingsStore<PairingSettings> {
        &self.settings
    }

    /// Subscribe to pairing state changes.
    pub fn subscribe(&self) -> watch::Receiver<PairingSettings> {
        self.settings.subscribe()
    }

    /// The connection manager owning the current session set.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Validate the developer token and request a pairing QR code.
    ///
    /// An empty token fails fast with a validation error and makes no
    /// network call. On success the flow holds the QR image URL in
    /// `AwaitingScan` (also returned for convenience); on HTTP failure
    /// or a vendor failure result it moves to `Error` carrying the
    /// vendor's message.
    pub async fn initialize(&mut self, token: &str) -> Result<String, CoreError> {
        let token = token.trim();
        if token.is_empty() {
            let message = "developer token must not be empty".to_owned();
            self.settings
                .update(|s| s.last_error = Some(message.clone()));
            return Err(CoreError::ValidationFailed { message });
        }

        self.settings.update(|s| {
            s.phase = PairingPhase::Initializing;
            s.developer_token = Some(token.to_owned());
            s.last_error = None;
        });

        let utoken = verification_token(&self.identity.id);
        match self
            .cloud
            .get_qr_code(token, &self.identity.id, &self.identity.name, &utoken)
            .await
        {
            Ok(url) => {
                info!("pairing QR code ready");
                self.settings.update(|s| {
                    s.phase = PairingPhase::AwaitingScan;
                    s.qr_code_url = Some(url.clone());
                });
                Ok(url)
            }
            Err(e) => {
                let message = pairing_message(&e);
                self.settings.update(|s| {
                    s.phase = PairingPhase::Error;
                    s.qr_code_url = None;
                    s.last_error = Some(message.clone());
                });
                Err(CoreError::PairingFailed { message })
            }
        }
    }

    /// Accept the callback payload delivered after a successful scan.
    ///
    /// Valid while awaiting a scan and while already connected (a later
    /// callback supersedes the session set wholesale). Delivery in any
    /// other phase -- including after teardown -- is tolerated as a
    /// logged no-op rather than a fault.
    pub fn on_connection_established(&mut self, info: ConnectionInfo) -> Result<(), CoreError> {
        let phase = self.settings.get().phase;
        match phase {
            PairingPhase::AwaitingScan | PairingPhase::Connected => {
                self.manager.handle_callback(info)?;
                self.settings.update(|s| {
                    s.phase = PairingPhase::Connected;
                    s.qr_code_url = None;
                    s.last_error = None;
                });
                Ok(())
            }
            _ => {
                warn!(?phase, "dropping callback delivered outside an active pairing");
                Ok(())
            }
        }
    }

    /// Tear down the session set and return to `Idle`. Idempotent.
    pub fn disconnect(&mut self) {
        self.manager.disconnect();
        self.settings.update(|s| {
            s.phase = PairingPhase::Idle;
            s.qr_code_url = None;
        });
        debug!("pairing flow reset");
    }
}

/// Deterministic user-verification token: `base64(user_id + salt)`.
///
/// Kept byte-compatible with what the vendor endpoint already accepts.
/// Not cryptographically strong, and not meant to be.
pub fn verification_token(user_id: &str) -> String {
    BASE64.encode(format!("{user_id}{VERIFY_SALT}"))
}

/// Reduce a transport-layer error to the string a UI should show.
fn pairing_message(err: &toylink_api::Error) -> String {
    match err {
        toylink_api::Error::Pairing { message, .. } => message.clone(),
        toylink_api::Error::Http { status, .. } => {
            format!("pairing endpoint returned HTTP {status}")
        }
        toylink_api::Error::Timeout { timeout_secs } => {
            format!("pairing endpoint timed out after {timeout_secs}s")
        }
        toylink_api::Error::Transport(e) => format!("pairing endpoint unreachable: {e}"),
        other => other.to_string(),
    }
}
