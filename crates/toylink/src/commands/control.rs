//! Motion commands: vibrate, rotate, pump, stop, preset, pattern.

use toylink_core::Preset;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::CliError;

pub async fn vibrate(
    cfg: &Config,
    global: &GlobalOpts,
    id: &str,
    intensity: f32,
) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;
    let session = super::session_or_err(&manager, id)?;
    session.vibrate(intensity).await?;
    println!("Vibrating {} at {intensity:.2}", session.display_name());
    Ok(())
}

pub async fn rotate(
    cfg: &Config,
    global: &GlobalOpts,
    id: &str,
    intensity: f32,
) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;
    let session = super::session_or_err(&manager, id)?;
    session.rotate(intensity).await?;
    println!("Rotating {} at {intensity:.2}", session.display_name());
    Ok(())
}

pub async fn pump(
    cfg: &Config,
    global: &GlobalOpts,
    id: &str,
    intensity: f32,
) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;
    let session = super::session_or_err(&manager, id)?;
    session.pump(intensity).await?;
    println!("Pumping {} at {intensity:.2}", session.display_name());
    Ok(())
}

/// Stop one device, or every device in the connection when `id` is None.
pub async fn stop(cfg: &Config, global: &GlobalOpts, id: Option<&str>) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;

    match id {
        Some(id) => {
            let session = super::session_or_err(&manager, id)?;
            session.stop().await?;
            println!("Stopped {}", session.display_name());
        }
        None => {
            let mut sessions = manager.list_sessions();
            sessions.sort_by(|a, b| a.id().cmp(b.id()));
            for session in &sessions {
                session.stop().await?;
                println!("Stopped {}", session.display_name());
            }
        }
    }
    Ok(())
}

pub async fn preset(
    cfg: &Config,
    global: &GlobalOpts,
    id: &str,
    preset: Preset,
    seconds: u64,
) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;
    let session = super::session_or_err(&manager, id)?;
    session.preset(preset, seconds).await?;
    println!(
        "Running {preset} on {} for {seconds}s",
        session.display_name()
    );
    Ok(())
}

pub async fn pattern(
    cfg: &Config,
    global: &GlobalOpts,
    id: &str,
    rule: &str,
    seconds: u64,
) -> Result<(), CliError> {
    let manager = super::load_manager(cfg, global)?;
    let session = super::session_or_err(&manager, id)?;
    session.pattern(rule, seconds).await?;
    println!("Running pattern on {} for {seconds}s", session.display_name());
    Ok(())
}
