//! Alarm sound playback

use std::{
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::{process::Command, runtime::Handle};
use tracing::{debug, info, warn};

use crate::controller::AlarmTrigger;

/// Sound resource behind the alarm.
///
/// Plays an external command when one is configured, otherwise rings the
/// terminal bell. The resource must be loaded before it makes any sound and
/// stays silent again once released.
#[derive(Debug)]
pub struct AlarmPlayer {
    command: Option<Vec<String>>,
    loaded: AtomicBool,
}

impl AlarmPlayer {
    /// Create an unloaded player from an optional shell-style command line
    pub fn new(command_line: Option<&str>) -> Result<Self, String> {
        let command = match command_line {
            Some(line) => {
                let argv = shlex::split(line)
                    .ok_or_else(|| format!("Invalid alarm command: {}", line))?;
                if argv.is_empty() {
                    return Err("Alarm command is empty".to_string());
                }
                Some(argv)
            }
            None => None,
        };

        Ok(Self {
            command,
            loaded: AtomicBool::new(false),
        })
    }

    /// Acquire the sound so the alarm can play
    pub fn load(&self) {
        self.loaded.store(true, Ordering::SeqCst);
        match &self.command {
            Some(argv) => info!("Alarm sound loaded: {}", argv.join(" ")),
            None => info!("Alarm sound loaded: terminal bell"),
        }
    }

    /// Release the sound; later alarms are skipped
    pub fn release(&self) {
        if self.loaded.swap(false, Ordering::SeqCst) {
            info!("Alarm sound released");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

impl AlarmTrigger for AlarmPlayer {
    fn play_alarm(&self) {
        if !self.is_loaded() {
            warn!("Alarm requested while the sound is released, skipping");
            return;
        }

        let Some(argv) = &self.command else {
            ring_terminal_bell();
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                let argv = argv.clone();
                handle.spawn(async move {
                    if let Err(e) = run_alarm_command(&argv).await {
                        warn!("Alarm playback failed: {}", e);
                    }
                });
            }
            Err(e) => warn!("No runtime available to play the alarm: {}", e),
        }
    }
}

/// Run the configured player to completion
pub async fn run_alarm_command(argv: &[String]) -> Result<(), String> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| "Alarm command is empty".to_string())?;
    debug!("Playing alarm with {}", program);

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }

    debug!("Alarm playback finished");
    Ok(())
}

fn ring_terminal_bell() {
    let mut stdout = std::io::stdout();
    if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        warn!("Failed to ring terminal bell: {}", e);
    }
}
