//! CLI error types and exit-code mapping.
//!
//! Maps `CoreError` variants into user-facing errors; `main` prints the
//! message and terminates with the matching exit code.

use thiserror::Error;

use toylink_core::CoreError;

/// Exit codes, stable for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(
        "No developer token configured -- pass --token, set TOYLINK_TOKEN, \
         or add `token` to the config file"
    )]
    NoToken,

    #[error("Not connected -- run `toylink qr`, scan the code, then `toylink connect <file>`")]
    NotConnected,

    #[error("Device '{id}' not found -- run `toylink devices` to list sessions")]
    DeviceNotFound { id: String },

    #[error("Pairing failed: {message}")]
    Pairing { message: String },

    #[error("Command failed: {message}")]
    Command { message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config loading failed: {0}")]
    Config(Box<figment::Error>),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::NoToken | Self::Pairing { .. } => exit_code::AUTH,
            Self::NotConnected => exit_code::CONNECTION,
            Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::PairingFailed { message } => CliError::Pairing { message },
            CoreError::CommandFailed { message } | CoreError::Internal(message) => {
                CliError::Command { message }
            }
            CoreError::NotConnected => CliError::NotConnected,
            CoreError::DeviceNotFound { identifier } => {
                CliError::DeviceNotFound { id: identifier }
            }
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
        }
    }
}
