//! `devices` command: list sessions from the stored connection.

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::CliError;

pub fn list(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;

    let mut sessions = manager.list_sessions();
    sessions.sort_by(|a, b| a.id().cmp(b.id()));

    if sessions.is_empty() {
        println!("No devices in the current connection.");
        return Ok(());
    }

    for session in &sessions {
        let status = if session.is_online() { "online" } else { "offline" };
        println!(
            "{:<16} {:<20} {:<8} {}",
            session.id(),
            session.display_name(),
            status,
            session.connection().platform
        );
    }
    Ok(())
}
