//! Pairing commands: `qr`, `connect`, `disconnect`.

use std::fs;
use std::path::Path;

use toylink_core::{CloudClient, ConnectionInfo, ConnectionManager, CoreError, PairingFlow};

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::error::CliError;

/// Request a pairing QR code and print the image URL.
///
/// The actual connection arrives out of band: the mobile app POSTs a
/// JSON payload to a callback endpoint on the developer's server. Save
/// that payload to a file and import it with `toylink connect`.
pub async fn qr(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let token = cfg.resolve_token(global)?;
    let transport = cfg.transport(global);
    let cloud = CloudClient::new(&transport).map_err(CoreError::from)?;
    let manager = ConnectionManager::new(transport);
    let mut flow = PairingFlow::new(cloud, manager, cfg.identity());

    let url = flow.initialize(&token).await?;

    println!("QR code image: {url}");
    println!();
    println!("Scan it with the Lovense Remote app. When the app confirms the");
    println!("pairing it POSTs a connection payload to your callback endpoint;");
    println!("save that JSON to a file and run:");
    println!();
    println!("    toylink connect <file>");
    Ok(())
}

/// Import a callback payload from a file and persist it.
pub fn connect(file: &Path) -> Result<(), CliError> {
    let contents = fs::read_to_string(file)?;
    let info: ConnectionInfo = serde_json::from_str(&contents)?;

    config::save_connection(&info)?;

    let online = info.toys.values().filter(|t| t.status.is_online()).count();
    println!(
        "Connected: {} device(s) ({online} online) via {}:{}",
        info.toys.len(),
        info.domain,
        info.secure_port
    );
    Ok(())
}

/// Forget the stored connection. Succeeds even when nothing is stored.
pub fn disconnect() -> Result<(), CliError> {
    config::clear_connection()?;
    println!("Disconnected.");
    Ok(())
}
