//! Break-finished notification sound

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, info};

/// How the end-of-break notification is played
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundPlayer {
    /// Terminal bell on stdout
    Bell,
    /// External player, e.g. `paplay /usr/share/sounds/freedesktop/stereo/complete.oga`
    Command { program: String, args: Vec<String> },
    /// Never make a sound
    Silent,
}

impl SoundPlayer {
    /// Build a player from a command line, splitting on whitespace
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::Command {
            program,
            args: parts.collect(),
        })
    }

    /// Play the notification once
    pub async fn play(&self) -> Result<(), String> {
        match self {
            SoundPlayer::Bell => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(b"\x07")
                    .await
                    .map_err(|e| format!("Failed to ring terminal bell: {}", e))?;
                stdout
                    .flush()
                    .await
                    .map_err(|e| format!("Failed to flush terminal bell: {}", e))?;
            }
            SoundPlayer::Command { program, args } => {
                debug!("Running sound command {} {:?}", program, args);

                let output = Command::new(program)
                    .args(args)
                    .output()
                    .await
                    .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(format!("{} failed: {}", program, stderr.trim()));
                }
            }
            SoundPlayer::Silent => return Ok(()),
        }

        info!("Break notification played");
        Ok(())
    }
}

impl Default for SoundPlayer {
    fn default() -> Self {
        SoundPlayer::Bell
    }
}
