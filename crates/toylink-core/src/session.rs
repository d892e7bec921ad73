// ── Device session ──
//
// One paired physical device. Each operation issues exactly one request
// against the LAN relay; nothing is queued, retried, or serialized per
// device. A failed command surfaces an error and leaves all state
// untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use toylink_api::types::Action;
use toylink_api::{ConnectionInfo, LanClient, Preset, ToyCommand, ToyRecord};

use crate::error::CoreError;

/// Discrete vendor scale for vibrate and rotate.
const VIBRATE_SCALE_MAX: u8 = 20;
/// Discrete vendor scale for pump.
const PUMP_SCALE_MAX: u8 = 3;

/// Default run time for presets and patterns, in seconds.
pub const DEFAULT_RUN_SECS: u64 = 10;

/// One paired device and the capability to command it over the LAN relay.
///
/// Created by [`ConnectionManager`](crate::ConnectionManager) from a
/// callback payload; destroyed when the manager is cleared or a newer
/// callback supersedes it. Holds shared read-only references to the
/// [`ToyRecord`] and [`ConnectionInfo`] snapshots that produced it.
pub struct DeviceSession {
    toy: Arc<ToyRecord>,
    info: Arc<ConnectionInfo>,
    lan: Arc<LanClient>,
    /// Monotonic per-session counter, bumped on every command sent.
    /// Diagnostics only -- the vendor API is stateless per request.
    command_seq: AtomicU64,
}

impl DeviceSession {
    pub(crate) fn new(toy: Arc<ToyRecord>, info: Arc<ConnectionInfo>, lan: Arc<LanClient>) -> Self {
        Self {
            toy,
            info,
            lan,
            command_seq: AtomicU64::new(0),
        }
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.toy.id
    }

    /// Nickname when set, device name otherwise.
    pub fn display_name(&self) -> &str {
        self.toy.display_name()
    }

    /// Status flag from the most recent callback snapshot.
    pub fn is_online(&self) -> bool {
        self.toy.status.is_online()
    }

    /// The connection snapshot this session was derived from.
    pub fn connection(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Commands sent through this session so far.
    pub fn commands_sent(&self) -> u64 {
        self.command_seq.load(Ordering::Relaxed)
    }

    // ── Motion commands ──────────────────────────────────────────────

    /// Vibrate at `intensity` in `[0, 1]`, mapped linearly to the vendor's
    /// 0-20 scale via rounding. Runs until stopped or superseded.
    pub async fn vibrate(&self, intensity: f32) -> Result<(), CoreError> {
        let level = scale_intensity(intensity, VIBRATE_SCALE_MAX)?;
        self.send(ToyCommand::motion(Action::Vibrate.with_level(level)))
            .await
    }

    /// Rotate at `intensity` in `[0, 1]`, same scale as vibrate.
    pub async fn rotate(&self, intensity: f32) -> Result<(), CoreError> {
        let level = scale_intensity(intensity, VIBRATE_SCALE_MAX)?;
        self.send(ToyCommand::motion(Action::Rotate.with_level(level)))
            .await
    }

    /// Pump at `intensity` in `[0, 1]`, mapped to the vendor's 0-3 scale.
    pub async fn pump(&self, intensity: f32) -> Result<(), CoreError> {
        let level = scale_intensity(intensity, PUMP_SCALE_MAX)?;
        self.send(ToyCommand::motion(Action::Pump.with_level(level)))
            .await
    }

    /// Cancel motion unconditionally.
    pub async fn stop(&self) -> Result<(), CoreError> {
        self.send(ToyCommand::stop()).await
    }

    /// Run a built-in pattern for `duration_secs` seconds, then the
    /// device stops on its own.
    pub async fn preset(&self, preset: Preset, duration_secs: u64) -> Result<(), CoreError> {
        let duration_secs = positive_duration(duration_secs)?;
        self.send(ToyCommand::preset(preset, duration_secs)).await
    }

    /// Run a raw pattern rule (opaque vendor grammar, passed through).
    pub async fn pattern(&self, rule: &str, duration_secs: u64) -> Result<(), CoreError> {
        let duration_secs = positive_duration(duration_secs)?;
        self.send(ToyCommand::pattern(rule.to_owned(), duration_secs))
            .await
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn send(&self, command: ToyCommand) -> Result<(), CoreError> {
        let seq = self.command_seq.fetch_add(1, Ordering::Relaxed);
        debug!(toy = %self.id(), seq, command = command.command, "sending device command");
        self.lan.send(self.id(), &command).await?;
        Ok(())
    }
}

/// Map an intensity in `[0, 1]` to the vendor's discrete integer scale.
fn scale_intensity(intensity: f32, max: u8) -> Result<u8, CoreError> {
    if !(0.0..=1.0).contains(&intensity) {
        return Err(CoreError::ValidationFailed {
            message: format!("intensity must be within [0, 1], got {intensity}"),
        });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok((intensity * f32::from(max)).round() as u8)
}

fn positive_duration(duration_secs: u64) -> Result<u64, CoreError> {
    if duration_secs == 0 {
        return Err(CoreError::ValidationFailed {
            message: "duration must be a positive number of seconds".into(),
        });
    }
    Ok(duration_secs)
}
