// CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use toylink_core::Preset;
use toylink_core::session::DEFAULT_RUN_SECS;

#[derive(Debug, Parser)]
#[command(
    name = "toylink",
    version,
    about = "Pair Lovense toys over the vendor cloud and drive them on the LAN relay",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Developer token (overrides the config file)
    #[arg(long, env = "TOYLINK_TOKEN", global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request a pairing QR code from the vendor cloud
    ///
    /// Scan the printed URL with the Lovense Remote app. Once the app
    /// confirms the pairing it POSTs a connection payload to your host's
    /// callback endpoint; import that JSON with `toylink connect`.
    Qr,

    /// Import a callback payload (ConnectionInfo JSON) and store it
    Connect {
        /// Path to the JSON file saved by the callback endpoint
        file: PathBuf,
    },

    /// List paired device sessions
    Devices,

    /// Vibrate a device at an intensity in [0, 1]
    Vibrate {
        /// Device id (see `toylink devices`)
        id: String,
        #[arg(long, default_value_t = 0.5)]
        intensity: f32,
    },

    /// Rotate a device at an intensity in [0, 1]
    Rotate {
        id: String,
        #[arg(long, default_value_t = 0.5)]
        intensity: f32,
    },

    /// Pump a device at an intensity in [0, 1]
    Pump {
        id: String,
        #[arg(long, default_value_t = 0.5)]
        intensity: f32,
    },

    /// Stop one device, or every device when no id is given
    Stop {
        id: Option<String>,
    },

    /// Run a built-in preset pattern for a fixed duration
    Preset {
        id: String,
        #[arg(value_enum)]
        name: PresetName,
        /// Run time in seconds
        #[arg(long, default_value_t = DEFAULT_RUN_SECS)]
        seconds: u64,
    },

    /// Send a raw pattern rule (vendor grammar, passed through)
    Pattern {
        id: String,
        rule: String,
        #[arg(long, default_value_t = DEFAULT_RUN_SECS)]
        seconds: u64,
    },

    /// Forget the stored connection
    Disconnect,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PresetName {
    Pulse,
    Wave,
    Fireworks,
    Earthquake,
}

impl From<PresetName> for Preset {
    fn from(name: PresetName) -> Self {
        match name {
            PresetName::Pulse => Preset::Pulse,
            PresetName::Wave => Preset::Wave,
            PresetName::Fireworks => Preset::Fireworks,
            PresetName::Earthquake => Preset::Earthquake,
        }
    }
}
