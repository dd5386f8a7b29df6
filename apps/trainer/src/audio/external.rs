//! Playback through an external player process.

use super::AudioError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Run `command` with the clip path appended and wait for it to exit.
///
/// The child is killed if the task is aborted. Its output is discarded so it
/// cannot draw over the terminal UI.
pub async fn play(command: &[String], path: &Path) -> Result<(), AudioError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| AudioError::Player("no player command configured".to_string()))?;

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| AudioError::Player(format!("cannot start {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(AudioError::Player(format!("{} exited with {}", program, status)))
    }
}
