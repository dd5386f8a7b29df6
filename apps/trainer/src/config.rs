//! Trainer configuration from environment variables.

use std::path::PathBuf;
use thiserror::Error;
use vocab_core::{AudioStrategy, CoreError, RowLayout};

/// Default A1 range of the vocabulary sheet (header row excluded).
pub const DEFAULT_SHEET_RANGE: &str = "vocabulary!A2:E";

/// Default external player command.
pub const DEFAULT_PLAYER: &str = "mpv --really-quiet --no-video";

/// The pronunciation host refuses requests without a browser User-Agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no vocabulary source: set VOCAB_SHEET_ID or VOCAB_FILE")]
    MissingSource,

    #[error("VOCAB_SHEET_ID is set but none of GOOGLE_APPLICATION_CREDENTIALS, GOOGLE_SHEETS_TOKEN or GOOGLE_API_KEY is")]
    MissingCredentials,

    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Credentials for the Google Sheets API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAuth {
    /// Service-account key file, exchanged for access tokens.
    ServiceAccount(PathBuf),
    Bearer(String),
    ApiKey(String),
}

/// Where the vocabulary lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    GoogleSheets {
        spreadsheet_id: String,
        range: String,
        auth: SheetAuth,
    },
    File(PathBuf),
}

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    pub strategy: AudioStrategy,
    /// Program followed by its arguments; the clip path is appended.
    pub player: Vec<String>,
    pub user_agent: String,
}

/// Full trainer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerConfig {
    pub source: SourceConfig,
    pub layout: RowLayout,
    pub audio: AudioConfig,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub daily_reset_hour: u32,
}

impl TrainerConfig {
    /// Read configuration from the process environment.
    ///
    /// Env vars:
    /// - VOCAB_SHEET_ID / VOCAB_SHEET_RANGE: Google spreadsheet and range
    /// - GOOGLE_APPLICATION_CREDENTIALS, GOOGLE_SHEETS_TOKEN or GOOGLE_API_KEY:
    ///   Sheets credentials, in that order of preference
    /// - VOCAB_FILE: CSV or XLSX file, used when no sheet id is set
    /// - VOCAB_COLUMNS: "source-first" (default) or "target-first"
    /// - AUDIO_STRATEGY: "inline", "external" (default) or "disabled"
    /// - AUDIO_PLAYER, AUDIO_USER_AGENT
    /// - VOCAB_DATA_DIR, VOCAB_LOG_FILE, DAILY_RESET_HOUR
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match (get("VOCAB_SHEET_ID"), get("VOCAB_FILE")) {
            (Some(spreadsheet_id), _) => {
                let auth = match (
                    get("GOOGLE_APPLICATION_CREDENTIALS"),
                    get("GOOGLE_SHEETS_TOKEN"),
                    get("GOOGLE_API_KEY"),
                ) {
                    (Some(path), _, _) => SheetAuth::ServiceAccount(PathBuf::from(path)),
                    (None, Some(token), _) => SheetAuth::Bearer(token),
                    (None, None, Some(key)) => SheetAuth::ApiKey(key),
                    (None, None, None) => return Err(ConfigError::MissingCredentials),
                };
                SourceConfig::GoogleSheets {
                    spreadsheet_id,
                    range: get("VOCAB_SHEET_RANGE").unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
                    auth,
                }
            }
            (None, Some(path)) => SourceConfig::File(PathBuf::from(path)),
            (None, None) => return Err(ConfigError::MissingSource),
        };

        let layout = match get("VOCAB_COLUMNS") {
            Some(name) => RowLayout::from_name(&name)?,
            None => RowLayout::default(),
        };

        let strategy = match get("AUDIO_STRATEGY") {
            Some(name) => AudioStrategy::from_name(&name)?,
            None => AudioStrategy::default(),
        };

        let player: Vec<String> = get("AUDIO_PLAYER")
            .unwrap_or_else(|| DEFAULT_PLAYER.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if player.is_empty() {
            return Err(ConfigError::Invalid {
                name: "AUDIO_PLAYER",
                message: "empty command".to_string(),
            });
        }

        let daily_reset_hour = match get("DAILY_RESET_HOUR") {
            Some(raw) => parse_hour(&raw)?,
            None => 0,
        };

        let data_dir = get("VOCAB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let log_file = get("VOCAB_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("trainer.log"));

        Ok(Self {
            source,
            layout,
            audio: AudioConfig {
                strategy,
                player,
                user_agent: get("AUDIO_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            },
            data_dir,
            log_file,
            daily_reset_hour,
        })
    }

    /// Directory for downloaded pronunciation clips.
    pub fn audio_cache_dir(&self) -> PathBuf {
        self.data_dir.join("audio")
    }

    /// File holding the trainer's own state (last decay day).
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }
}

fn parse_hour(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |message: String| ConfigError::Invalid {
        name: "DAILY_RESET_HOUR",
        message,
    };
    let hour: u32 = raw.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    if hour > 23 {
        return Err(invalid(format!("{} is not an hour of the day", hour)));
    }
    Ok(hour)
}

fn default_data_dir() -> PathBuf {
    // Use the platform data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-trainer")
}
