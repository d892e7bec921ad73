// toylink-core: Domain layer between toylink-api and consumers (CLI, hosts).
//
// Owns the session lifecycle: the pairing state machine, the connection
// manager rebuilt from each callback, and the per-device sessions that
// translate motion intents into single relay requests.

pub mod error;
pub mod manager;
pub mod pairing;
pub mod session;
pub mod settings;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use manager::ConnectionManager;
pub use pairing::{PairingFlow, PairingPhase, PairingSettings, UserIdentity};
pub use session::DeviceSession;
pub use settings::SettingsStore;

// Re-export the wire types consumers handle directly.
pub use toylink_api::{
    CloudClient, ConnectionInfo, LanClient, Preset, TlsMode, ToyRecord, ToyStatus,
    TransportConfig,
};
