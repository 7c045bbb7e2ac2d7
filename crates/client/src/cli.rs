//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::encounter::EncounterSettings;

/// Runs a scripted status-effect encounter
#[derive(Debug, Parser)]
#[command(name = "effect-sim")]
#[command(about = "Status-effect encounter simulator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding config.toml, effects.ron and immunities.ron
    #[arg(long, env = "EFFECT_DATA_DIR", default_value = "crates/client/data")]
    pub data_dir: PathBuf,

    /// Seconds to simulate after the opening script
    #[arg(long, default_value_t = 8)]
    pub seconds: u64,

    /// Driver step in milliseconds
    #[arg(long, default_value_t = 250)]
    pub step_ms: u64,

    /// Seconds per combat round
    #[arg(long, default_value_t = 2)]
    pub round_secs: u64,

    /// Drive the encounter with the background runtime in wall-clock time
    #[arg(long)]
    pub realtime: bool,

    /// Also write logs to this directory
    #[arg(long, env = "EFFECT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn settings(&self) -> EncounterSettings {
        EncounterSettings {
            duration: Duration::from_secs(self.seconds),
            step: Duration::from_millis(self.step_ms),
            round: Duration::from_secs(self.round_secs),
        }
    }
}
