//! CLI configuration and connection persistence.
//!
//! TOML config (`config.toml` in the platform config dir) layered with
//! `TOYLINK_*` environment variables via figment. The connection payload
//! imported by `toylink connect` is kept as JSON in the platform data
//! dir so later invocations can rebuild sessions without re-pairing.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use toylink_core::{ConnectionInfo, TlsMode, TransportConfig, UserIdentity};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Lovense developer token. Usually supplied via `--token` or the
    /// `TOYLINK_TOKEN` environment variable instead.
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip TLS certificate verification for the LAN relay.
    #[serde(default)]
    pub insecure: bool,

    /// Identity echoed back by the vendor cloud during pairing.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default = "default_user_name")]
    pub user_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            timeout: default_timeout(),
            insecure: false,
            user_id: default_user_id(),
            user_name: default_user_name(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
fn default_user_id() -> String {
    "toylink-user".into()
}
fn default_user_name() -> String {
    "Toylink".into()
}

impl Config {
    /// Layered load: defaults, then `config.toml`, then `TOYLINK_*` env.
    pub fn load() -> Result<Self, CliError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_path() {
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            .merge(Env::prefixed("TOYLINK_"))
            .extract::<Config>()?;
        Ok(config)
    }

    /// Token resolution order: `--token` flag (also the `TOYLINK_TOKEN`
    /// env var, via clap), then the config file.
    pub fn resolve_token(&self, global: &GlobalOpts) -> Result<String, CliError> {
        global
            .token
            .clone()
            .or_else(|| self.token.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or(CliError::NoToken)
    }

    pub fn transport(&self, global: &GlobalOpts) -> TransportConfig {
        TransportConfig {
            tls: if self.insecure {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: std::time::Duration::from_secs(global.timeout.unwrap_or(self.timeout)),
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.user_id.clone(),
            name: self.user_name.clone(),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "toylink")
}

pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

fn connection_path() -> Result<PathBuf, CliError> {
    let dirs = project_dirs().ok_or_else(|| {
        CliError::Io(std::io::Error::other("could not determine a home directory"))
    })?;
    Ok(dirs.data_dir().join("connection.json"))
}

// ── Connection persistence ──────────────────────────────────────────

/// The stored callback payload, if any.
pub fn load_connection() -> Result<Option<ConnectionInfo>, CliError> {
    let path = connection_path()?;
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

pub fn save_connection(info: &ConnectionInfo) -> Result<(), CliError> {
    let path = connection_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(info)?)?;
    Ok(())
}

/// Remove the stored payload. Missing file is fine.
pub fn clear_connection() -> Result<(), CliError> {
    let path = connection_path()?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
