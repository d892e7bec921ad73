// toylink-api: Async Rust client for the Lovense cloud pairing and LAN relay APIs

pub mod cloud;
pub mod error;
pub mod lan;
pub mod transport;
pub mod types;

pub use cloud::CloudClient;
pub use error::Error;
pub use lan::LanClient;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    Action, CommandResponse, ConnectionInfo, Preset, ToyCommand, ToyRecord, ToyStatus,
    UnknownPreset,
};
