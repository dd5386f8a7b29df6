//! In-process decoding and playback with rodio.

use super::AudioError;
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Decode and play `path` on the default output device.
///
/// Runs on the blocking pool; `cancel` stops the sink early.
pub async fn play(path: PathBuf, cancel: Arc<AtomicBool>) -> Result<(), AudioError> {
    tokio::task::spawn_blocking(move || play_blocking(&path, &cancel))
        .await
        .map_err(|e| AudioError::Device(e.to_string()))?
}

fn play_blocking(path: &Path, cancel: &AtomicBool) -> Result<(), AudioError> {
    // The stream must outlive the sink.
    let (_stream, handle) = OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| AudioError::Device(e.to_string()))?;

    let file = BufReader::new(File::open(path)?);
    let source = Decoder::new(file).map_err(|e| AudioError::Decode(e.to_string()))?;
    sink.append(source);

    while !sink.empty() {
        if cancel.load(Ordering::Relaxed) {
            sink.stop();
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    Ok(())
}
