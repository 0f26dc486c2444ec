//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::services::SoundPlayer;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "ratio-timer")]
#[command(about = "A study timer that earns break time at a fixed study-to-break ratio")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding saved settings and session history
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Command that plays the break-finished sound (default: terminal bell)
    #[arg(long)]
    pub sound_command: Option<String>,

    /// Never play the break-finished sound, whatever the saved setting says
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Data directory, defaulting to the platform's local data dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("ratio-timer"))
                .unwrap_or_else(|| PathBuf::from(".ratio-timer"))
        })
    }

    /// Sound player chosen by `--mute` and `--sound-command`
    pub fn sound_player(&self) -> SoundPlayer {
        if self.mute {
            return SoundPlayer::Silent;
        }
        self.sound_command
            .as_deref()
            .and_then(SoundPlayer::from_command_line)
            .unwrap_or_default()
    }
}
