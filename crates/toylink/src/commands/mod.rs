//! Command dispatch: bridges CLI args to core operations.

pub mod control;
pub mod devices;
pub mod pair;

use toylink_core::{ConnectionManager, CoreError};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Dispatch a parsed subcommand to its handler.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Qr => pair::qr(cfg, global).await,
        Command::Connect { file } => pair::connect(&file),
        Command::Disconnect => pair::disconnect(),
        Command::Devices => devices::list(cfg, global),
        Command::Vibrate { id, intensity } => control::vibrate(cfg, global, &id, intensity).await,
        Command::Rotate { id, intensity } => control::rotate(cfg, global, &id, intensity).await,
        Command::Pump { id, intensity } => control::pump(cfg, global, &id, intensity).await,
        Command::Stop { id } => control::stop(cfg, global, id.as_deref()).await,
        Command::Preset { id, name, seconds } => {
            control::preset(cfg, global, &id, name.into(), seconds).await
        }
        Command::Pattern { id, rule, seconds } => {
            control::pattern(cfg, global, &id, &rule, seconds).await
        }
    }
}

/// Rebuild the session set from the stored connection payload.
///
/// Each invocation is stateless: the payload saved by `toylink connect`
/// is replayed through the manager exactly as a live callback would be.
pub fn load_manager(cfg: &Config, global: &GlobalOpts) -> Result<ConnectionManager, CliError> {
    let info = config::load_connection()?.ok_or(CliError::NotConnected)?;
    let mut manager = ConnectionManager::new(cfg.transport(global));
    manager.handle_callback(info)?;
    Ok(manager)
}

/// Look up a session, mapping a miss to the device-not-found error.
pub fn session_or_err(
    manager: &ConnectionManager,
    id: &str,
) -> Result<std::sync::Arc<toylink_core::DeviceSession>, CliError> {
    manager
        .get_session(id)
        .ok_or_else(|| CoreError::DeviceNotFound {
            identifier: id.to_owned(),
        })
        .map_err(CliError::from)
}
