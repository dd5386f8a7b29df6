//! Trainer state kept between runs.

pub mod date_utils;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted trainer state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerState {
    /// Study day of the last score decay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_decay_on: Option<NaiveDate>,
}

impl TrainerState {
    /// Whether scores were already decayed on `today`.
    pub fn decayed_on(&self, today: NaiveDate) -> bool {
        self.last_decay_on == Some(today)
    }

    pub fn mark_decayed(&mut self, today: NaiveDate) {
        self.last_decay_on = Some(today);
    }
}

/// JSON file holding a [`TrainerState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state. A missing or unreadable file yields the default state.
    pub fn load(&self) -> TrainerState {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt state file {}: {}", self.path.display(), e);
                TrainerState::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TrainerState::default(),
            Err(e) => {
                tracing::warn!("Cannot read state file {}: {}", self.path.display(), e);
                TrainerState::default()
            }
        }
    }

    pub fn save(&self, state: &TrainerState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
