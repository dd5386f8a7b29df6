//! Core types for the vocabulary trainer.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Points added to an entry's score for each correct answer.
pub const CORRECT_ANSWER_POINTS: u32 = 2;

/// Number of cells in a vocabulary row.
pub const ROW_WIDTH: usize = 5;

/// One flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Term shown as the prompt.
    pub source_text: String,
    /// Expected answer.
    pub target_text: String,
    /// URL or local path of the pronunciation clip, may be empty.
    pub audio_ref: String,
    pub tag: String,
    pub score: u32,
}

impl VocabularyEntry {
    pub fn new(source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_text: target_text.into(),
            audio_ref: String::new(),
            tag: String::new(),
            score: 0,
        }
    }

    /// Set the score (builder style, mostly for fixtures).
    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    /// Set the audio reference (builder style).
    pub fn with_audio(mut self, audio_ref: impl Into<String>) -> Self {
        self.audio_ref = audio_ref.into();
        self
    }

    /// Record a correct answer. Scores have no upper bound short of `u32::MAX`.
    pub fn reward(&mut self) {
        self.score = self.score.saturating_add(CORRECT_ANSWER_POINTS);
    }

    /// Lower the score by one, floor 0. Returns true if the score changed.
    pub fn decay(&mut self) -> bool {
        if self.score == 0 {
            return false;
        }
        self.score -= 1;
        true
    }
}

/// How pronunciation clips are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioStrategy {
    /// Decode and play in process.
    InlineDecode,
    /// Hand the downloaded file to an external player.
    ExternalProcess,
    Disabled,
}

impl Default for AudioStrategy {
    fn default() -> Self {
        Self::ExternalProcess
    }
}

impl AudioStrategy {
    /// Get the strategy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InlineDecode => "inline",
            Self::ExternalProcess => "external",
            Self::Disabled => "disabled",
        }
    }

    /// Parse from a configuration name.
    pub fn from_name(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" | "inline-decode" => Ok(Self::InlineDecode),
            "external" | "external-process" => Ok(Self::ExternalProcess),
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            other => Err(CoreError::UnknownAudioStrategy(other.to_string())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// Column order of the five-cell vocabulary row.
///
/// Audio, tag and score always occupy the last three columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLayout {
    /// source, target, audio, tag, score
    SourceFirst,
    /// target, source, audio, tag, score
    TargetFirst,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::SourceFirst
    }
}

impl RowLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceFirst => "source-first",
            Self::TargetFirst => "target-first",
        }
    }

    pub fn from_name(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source-first" | "source_first" => Ok(Self::SourceFirst),
            "target-first" | "target_first" => Ok(Self::TargetFirst),
            other => Err(CoreError::UnknownRowLayout(other.to_string())),
        }
    }

    /// Column indices of (source, target).
    pub fn text_columns(&self) -> (usize, usize) {
        match self {
            Self::SourceFirst => (0, 1),
            Self::TargetFirst => (1, 0),
        }
    }

    /// Header cells for file sources that carry a header row.
    pub fn header(&self) -> [&'static str; ROW_WIDTH] {
        match self {
            Self::SourceFirst => ["source", "target", "audio", "tag", "score"],
            Self::TargetFirst => ["target", "source", "audio", "tag", "score"],
        }
    }
}
