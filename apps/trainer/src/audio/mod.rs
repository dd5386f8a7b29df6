//! Pronunciation playback.
//!
//! The quiz session only asks for a clip to be played. The dispatcher turns
//! each request into a tokio task it owns: a new request aborts the clip that
//! is still playing, and nothing here blocks answer matching.

pub mod external;
pub mod fetch;
#[cfg(feature = "inline-audio")]
pub mod inline;

use crate::config::AudioConfig;
use fetch::ClipFetcher;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use vocab_core::AudioStrategy;

/// Audio errors. Logged by the dispatcher, never shown as fatal.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Download of {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Audio file not found: {0}")]
    Missing(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Player error: {0}")]
    Player(String),

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Inline playback is not available: {0}")]
    Unsupported(String),
}

/// Plays pronunciation clips for the quiz screen.
pub trait Pronouncer {
    /// Start playing `audio_ref` without waiting for it.
    fn play(&mut self, audio_ref: &str);

    /// Stop whatever is playing.
    fn stop(&mut self);
}

struct PlaybackTask {
    handle: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

/// Runs each clip as a task on the given runtime.
pub struct AudioDispatcher {
    runtime: Handle,
    strategy: AudioStrategy,
    fetcher: Arc<ClipFetcher>,
    player: Arc<Vec<String>>,
    current: Option<PlaybackTask>,
}

impl AudioDispatcher {
    pub fn new(runtime: Handle, config: &AudioConfig, cache_dir: PathBuf) -> Self {
        if config.strategy == AudioStrategy::InlineDecode && !cfg!(feature = "inline-audio") {
            tracing::warn!("AUDIO_STRATEGY=inline but this build has no inline-audio feature");
        }
        Self {
            runtime,
            strategy: config.strategy,
            fetcher: Arc::new(ClipFetcher::new(cache_dir, config.user_agent.clone())),
            player: Arc::new(config.player.clone()),
            current: None,
        }
    }

    /// Whether the last clip is still being fetched or played.
    pub fn is_playing(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

impl Pronouncer for AudioDispatcher {
    fn play(&mut self, audio_ref: &str) {
        if !self.strategy.is_enabled() {
            tracing::debug!("Audio disabled, not playing {}", audio_ref);
            return;
        }
        if audio_ref.is_empty() {
            return;
        }

        self.stop();

        let cancel = Arc::new(AtomicBool::new(false));
        let strategy = self.strategy;
        let fetcher = Arc::clone(&self.fetcher);
        let player = Arc::clone(&self.player);
        let audio_ref = audio_ref.to_string();
        let task_cancel = Arc::clone(&cancel);

        let handle = self.runtime.spawn(async move {
            if let Err(e) = play_clip(strategy, &fetcher, &player, &audio_ref, task_cancel).await {
                tracing::warn!("Cannot play {}: {}", audio_ref, e);
            }
        });

        self.current = Some(PlaybackTask { handle, cancel });
    }

    fn stop(&mut self) {
        if let Some(task) = self.current.take() {
            task.cancel.store(true, Ordering::Relaxed);
            task.handle.abort();
        }
    }
}

impl Drop for AudioDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn play_clip(
    strategy: AudioStrategy,
    fetcher: &ClipFetcher,
    player: &[String],
    audio_ref: &str,
    cancel: Arc<AtomicBool>,
) -> Result<(), AudioError> {
    let path = fetcher.resolve(audio_ref).await?;
    tracing::debug!("Playing {} from {}", audio_ref, path.display());

    match strategy {
        AudioStrategy::ExternalProcess => external::play(player, &path).await,
        AudioStrategy::InlineDecode => play_inline(path, cancel).await,
        AudioStrategy::Disabled => Ok(()),
    }
}

#[cfg(feature = "inline-audio")]
async fn play_inline(path: PathBuf, cancel: Arc<AtomicBool>) -> Result<(), AudioError> {
    inline::play(path, cancel).await
}

#[cfg(not(feature = "inline-audio"))]
async fn play_inline(_path: PathBuf, _cancel: Arc<AtomicBool>) -> Result<(), AudioError> {
    Err(AudioError::Unsupported(
        "rebuild with --features inline-audio or use AUDIO_STRATEGY=external".to_string(),
    ))
}
