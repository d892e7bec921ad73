// ── Core error types ──
//
// User-facing errors from toylink-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<toylink_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Local input was empty, malformed, or out of range. Raised before
    /// any network request is made.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// The cloud pairing endpoint returned failure or was unreachable.
    #[error("Pairing failed: {message}")]
    PairingFailed { message: String },

    /// A device command request failed, timed out, or the relay reported
    /// a non-success code.
    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    /// No connection established (no callback received yet, or after
    /// disconnect).
    #[error("Not connected -- pair a device first")]
    NotConnected,

    /// No session exists for the requested device id.
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    /// A request exceeded its fixed per-command timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ──────────────────────────
//
// Command-flavored: this path is taken by device sessions and the server
// relay. The pairing flow does its own mapping to `PairingFailed` so the
// error taxonomy follows the operation, not the wire.

impl From<toylink_api::Error> for CoreError {
    fn from(err: toylink_api::Error) -> Self {
        match err {
            toylink_api::Error::Pairing { message, .. } => CoreError::PairingFailed { message },
            toylink_api::Error::Command { message, .. } => CoreError::CommandFailed { message },
            toylink_api::Error::Http { status, body } => CoreError::CommandFailed {
                message: if body.is_empty() {
                    format!("relay returned HTTP {status}")
                } else {
                    format!("relay returned HTTP {status}: {body}")
                },
            },
            toylink_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            toylink_api::Error::Transport(e) => CoreError::CommandFailed {
                message: e.to_string(),
            },
            toylink_api::Error::InvalidUrl(e) => CoreError::ValidationFailed {
                message: format!("invalid relay address: {e}"),
            },
            toylink_api::Error::Tls(message) => CoreError::CommandFailed { message },
            toylink_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("unexpected relay response: {message}"))
            }
        }
    }
}
