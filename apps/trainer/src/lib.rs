pub mod audio;
pub mod config;
pub mod sheet;
pub mod state;
pub mod tui;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::Deck;

use crate::audio::AudioDispatcher;
use crate::config::TrainerConfig;
use crate::sheet::open_source;
use crate::state::StateStore;
use crate::tui::App;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = TrainerConfig::from_env().context("Invalid configuration")?;
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Cannot create data directory {}", config.data_dir.display()))?;

    init_tracing(&config.log_file)?;
    tracing::info!("Starting vocab-trainer");

    // Audio tasks only; spreadsheet calls stay on the UI thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("audio")
        .enable_all()
        .build()
        .context("Cannot start the audio runtime")?;

    let source = open_source(&config.source, config.layout).context("Cannot open vocabulary source")?;

    tracing::info!("Loading vocabulary from {}", source.describe());
    let entries = source
        .fetch()
        .with_context(|| format!("Failed to load vocabulary from {}", source.describe()))?;
    tracing::info!("Loaded {} words", entries.len());

    let pronouncer = AudioDispatcher::new(
        runtime.handle().clone(),
        &config.audio,
        config.audio_cache_dir(),
    );

    let mut app = App::new(
        Deck::new(entries),
        source,
        Box::new(pronouncer),
        StateStore::new(config.state_file()),
    )
    .with_daily_reset_hour(config.daily_reset_hour)
    .with_audio_enabled(config.audio.strategy.is_enabled());

    let result = tui::run(&mut app).context("Terminal error");

    // Stops any clip before the runtime goes away.
    drop(app);
    runtime.shutdown_timeout(Duration::from_secs(1));

    tracing::info!("Shutting down");
    result
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing(log_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Cannot open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}
