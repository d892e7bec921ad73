// ── Connection manager ──
//
// Owns the device-id -> session map for one paired connection. The map is
// rebuilt wholesale from each callback payload -- never merged. Sessions
// are immutable values sharing one Arc'd ConnectionInfo and one LAN
// client; this manager holds the only mutable collection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use toylink_api::{ConnectionInfo, LanClient, TransportConfig};

use crate::error::CoreError;
use crate::session::DeviceSession;

/// Owner of the session set derived from the most recent callback.
///
/// Invariant: the session map's keys exactly equal `connection_info.toys`
/// keys whenever info is set; both are empty/unset together after
/// [`disconnect`](Self::disconnect).
pub struct ConnectionManager {
    sessions: HashMap<String, Arc<DeviceSession>>,
    info: Option<Arc<ConnectionInfo>>,
    transport: TransportConfig,
}

impl ConnectionManager {
    pub fn new(transport: TransportConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            info: None,
            transport,
        }
    }

    /// Rebuild the session set from a callback payload.
    ///
    /// Full replace: sessions absent from the new payload are discarded,
    /// and any in-flight commands on them become orphaned -- no
    /// cancellation signal is sent to the relay. Callers still holding an
    /// `Arc` to a discarded session keep a working handle to the old
    /// relay endpoint until they drop it.
    pub fn handle_callback(&mut self, info: ConnectionInfo) -> Result<(), CoreError> {
        let lan = Arc::new(LanClient::new(&info, &self.transport)?);
        self.install(info, lan);
        Ok(())
    }

    /// Same as [`handle_callback`](Self::handle_callback) with an
    /// explicit relay client, for hosts (and tests) that resolve the
    /// relay endpoint themselves.
    pub fn handle_callback_with(&mut self, info: ConnectionInfo, lan: Arc<LanClient>) {
        self.install(info, lan);
    }

    fn install(&mut self, info: ConnectionInfo, lan: Arc<LanClient>) {
        let info = Arc::new(info);
        self.sessions = info
            .toys
            .iter()
            .map(|(id, toy)| {
                let session =
                    DeviceSession::new(Arc::new(toy.clone()), Arc::clone(&info), Arc::clone(&lan));
                (id.clone(), Arc::new(session))
            })
            .collect();
        info!(
            devices = self.sessions.len(),
            platform = %info.platform,
            "connection established"
        );
        self.info = Some(info);
    }

    /// Snapshot of all sessions. Order is not stable across calls
    /// (backed by a hash map).
    pub fn list_sessions(&self) -> Vec<Arc<DeviceSession>> {
        self.sessions.values().map(Arc::clone).collect()
    }

    pub fn get_session(&self, id: &str) -> Option<Arc<DeviceSession>> {
        self.sessions.get(id).map(Arc::clone)
    }

    /// The connection snapshot currently in effect.
    pub fn connection_info(&self) -> Option<Arc<ConnectionInfo>> {
        self.info.as_ref().map(Arc::clone)
    }

    /// True iff a callback payload is currently installed.
    pub fn is_connected(&self) -> bool {
        self.info.is_some()
    }

    /// Clear all sessions and the stored connection info. Idempotent --
    /// a second call is a no-op.
    pub fn disconnect(&mut self) {
        if self.info.is_none() && self.sessions.is_empty() {
            return;
        }
        self.sessions.clear();
        self.info = None;
        debug!("disconnected");
    }
}
